pub mod api;
pub mod config;
pub mod error;
pub mod telemetry;

pub use api::{build_router, AppState};
