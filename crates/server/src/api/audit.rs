use aegis_core::AuditEvent;
use aegis_coordinator::TimelineEvent;
use axum::extract::{Path, State};
use axum::Json;

use super::AppState;

/// `GET /api/audit/decision/{id}`.
pub async fn decision(State(state): State<AppState>, Path(id): Path<String>) -> Json<Vec<AuditEvent>> {
    Json(state.coordinator.get_decision_audit(&id).await)
}

/// `GET /api/audit/incident/{id}`.
pub async fn incident(State(state): State<AppState>, Path(id): Path<String>) -> Json<Vec<AuditEvent>> {
    Json(state.coordinator.get_incident_audit(&id).await)
}

/// `GET /api/timeline` -- the bounded recent-events ring, oldest first.
pub async fn timeline(State(state): State<AppState>) -> Json<Vec<TimelineEvent>> {
    Json(state.coordinator.timeline().await)
}
