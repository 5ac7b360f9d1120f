//! Data model and shared abstractions for the Aegis disaster-response
//! coordination server: the situation graph aggregate, its node and edge
//! types, and the small set of parsing/geometry helpers the rest of the
//! workspace builds on.

pub mod allocation;
pub mod analyzer_output;
pub mod contradiction;
pub mod debate;
pub mod domain;
pub mod error;
pub mod geo;
pub mod graph;
pub mod recommendation;
pub mod urgency;
pub mod voice;

pub use allocation::{AllocationPlan, CampRecommendation, ResourceAssignment};
pub use analyzer_output::AnalyzerOutput;
pub use contradiction::{Claim, ContradictionAlert, RecommendedActionType, Severity, Verdict};
pub use debate::{DebateRole, DebateTurn};
pub use domain::{
    Accessibility, DamageLevel, EdgeType, GraphEdge, IncidentNode, IncidentStatus, LocationNode,
    LocationNodeStatus, ResourceNode, ResourceStatus, SourceReference, SourceType,
};
pub use error::GraphError;
pub use geo::{haversine_km, jittered_fallback_location, Location};
pub use graph::{AuditEvent, SituationGraph, PLACEHOLDER_ETA_MINUTES};
pub use recommendation::{ActionRecommendation, ActionStatus};
pub use urgency::{parse_urgency, Urgency};
pub use voice::VoiceReport;
