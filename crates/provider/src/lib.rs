//! Analyzer oracles for the Aegis disaster-response coordination server.
//!
//! An [`Oracle`] is the one dynamic seam in this crate: a stand-in for a
//! credential-bearing call to an external LLM provider. Each of the eight
//! analyzers below wraps an `Arc<dyn Oracle>`, builds a task-specific
//! prompt, and on any oracle failure or unparseable response falls back to
//! a deterministic, scenario-appropriate `AnalyzerOutput`. This is the
//! reason this system is fully operable (and its properties testable)
//! without any live provider.

pub mod allocation;
pub mod audio;
pub mod debate;
pub mod error;
pub mod extract;
pub mod oracle;
pub mod planning;
pub mod temporal;
pub mod text;
pub mod verification;
pub mod vision;

pub use error::OracleError;
pub use extract::extract_json;
pub use oracle::{NullOracle, Oracle};

pub use allocation::{AllocationAnalyzer, AllocationInput};
pub use audio::{AudioAnalyzer, AudioInput};
pub use debate::{DebateAnalyzer, DebateInput};
pub use planning::{PlanningAnalyzer, PlanningInput};
pub use temporal::{TemporalAnalyzer, TemporalInput};
pub use text::{TextAnalyzer, TextInput};
pub use verification::{VerificationAnalyzer, VerificationInput};
pub use vision::{VisionAnalyzer, VisionInput};
