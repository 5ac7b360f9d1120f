use thiserror::Error;

/// Errors raised by situation-graph mutation operations.
///
/// These are validation/invariant failures internal to the data model; the
/// HTTP-boundary error taxonomy lives in `aegis-server`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("incident not found: {0}")]
    IncidentNotFound(String),

    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    #[error("location not found: {0}")]
    LocationNotFound(String),

    #[error("contradiction alert not found: {0}")]
    AlertNotFound(String),

    #[error("action recommendation not found: {0}")]
    ActionNotFound(String),

    #[error("allocation plan not found: {0}")]
    PlanNotFound(String),

    #[error("camp recommendation not found: {0}")]
    CampNotFound(String),
}
