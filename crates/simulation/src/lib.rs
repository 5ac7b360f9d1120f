//! Scenario playback for demo and exercise runs.
//!
//! A [`Scenario`](scenario::Scenario) describes starting resources,
//! starting locations, and a timed event timeline: scripted signals,
//! aftershocks, resource status changes, contradiction injections, and
//! narration markers. [`SimulationDriver`] replays one against wall-clock
//! time, driving a `Coordinator` the same way a live signal feed would.

pub mod driver;
pub mod loader;
pub mod scenario;

pub use driver::SimulationDriver;
pub use loader::{resolve, NullScenarioLoader, ScenarioLoader};
pub use scenario::{default_scenario, EventKind, Scenario, ScenarioEvent};
