//! HTTP-boundary error taxonomy. The coordinator never surfaces raw
//! analyzer errors to callers (they collapse to deterministic fallbacks
//! internally); everything reaching this layer is a graph-level "not
//! found" or a coordinator-lifecycle condition, mapped to the
//! appropriate status code.

use aegis_core::GraphError;
use aegis_coordinator::CoordinatorError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoordinatorHttpError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("not ready: {0}")]
    NotReady(String),

    #[error("bad upstream response: {0}")]
    BadUpstream(String),

    #[error("upstream timed out: {0}")]
    UpstreamTimeout(String),
}

impl From<CoordinatorError> for CoordinatorHttpError {
    fn from(err: CoordinatorError) -> Self {
        match err {
            CoordinatorError::Graph(graph_err) => Self::NotFound(graph_err.to_string()),
            CoordinatorError::NoDebateTarget(msg) => Self::NotFound(msg),
            CoordinatorError::Audit(msg) => Self::BadUpstream(msg),
        }
    }
}

impl From<GraphError> for CoordinatorHttpError {
    fn from(err: GraphError) -> Self {
        Self::NotFound(err.to_string())
    }
}

impl IntoResponse for CoordinatorHttpError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::NotReady(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            Self::BadUpstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            Self::UpstreamTimeout(msg) => (StatusCode::GATEWAY_TIMEOUT, msg.clone()),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_not_found_maps_to_404() {
        let err: CoordinatorHttpError = GraphError::IncidentNotFound("inc_1".to_string()).into();
        assert!(matches!(err, CoordinatorHttpError::NotFound(_)));
    }
}
