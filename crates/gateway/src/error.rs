use aegis_core::GraphError;
use thiserror::Error;

/// Errors raised by the coordinator's own operations, on top of whatever
/// the situation graph rejects.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("no debate can be started: {0}")]
    NoDebateTarget(String),

    #[error("audit store error: {0}")]
    Audit(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_error_wraps_through_display() {
        let err = CoordinatorError::from(GraphError::AlertNotFound("alert_1".to_string()));
        assert_eq!(err.to_string(), "contradiction alert not found: alert_1");
    }
}
