//! Orchestration for the Aegis disaster-response coordination server:
//! the situation-graph mutation engine's caller, the contradiction
//! detector, the planning trigger's cooldown gate, the broadcast
//! fabric, and the `Coordinator` that ties signal ingestion, operator
//! decisions, debate, and allocation together. Grounded on
//! `crates/gateway` (builder composition root) and
//! `original_source/backend/orchestrator/coordinator.py` (mutation
//! and pipeline semantics).

pub mod broadcast;
pub mod builder;
pub mod contradiction_detector;
pub mod coordinator;
pub mod error;
pub mod planning_trigger;

pub use aegis_core::Location;
pub use broadcast::{BroadcastEvent, Broadcaster};
pub use builder::CoordinatorBuilder;
pub use coordinator::{
    AllocationOutcome, Coordinator, ProcessedSignal, SignalContent, SignalMetadata,
    SimulationStatus, TimelineEvent,
};
pub use contradiction_detector::EntityClaims;
pub use error::CoordinatorError;

/// The deterministic jittered-location fallback used whenever a signal
/// carries no `metadata.location`.
#[must_use]
pub fn jittered(signal_id: &str) -> Location {
    aegis_core::jittered_fallback_location(signal_id)
}
