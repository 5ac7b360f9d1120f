use aegis_core::{ActionStatus, IncidentNode, ResourceNode, SituationGraph};
use axum::extract::{Path, State};
use axum::Json;

use super::schemas::GraphStats;
use super::AppState;
use crate::error::CoordinatorHttpError;

/// `GET /api/graph` -- the full current situation graph.
pub async fn graph(State(state): State<AppState>) -> Json<SituationGraph> {
    Json(state.coordinator.snapshot().await)
}

/// `GET /api/graph/incidents` -- every incident, active or resolved.
pub async fn incidents(State(state): State<AppState>) -> Json<Vec<IncidentNode>> {
    let snapshot = state.coordinator.snapshot().await;
    Json(snapshot.incidents.into_values().collect())
}

/// `GET /api/graph/incidents/{id}`.
pub async fn incident(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<IncidentNode>, CoordinatorHttpError> {
    let snapshot = state.coordinator.snapshot().await;
    snapshot
        .incidents
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| CoordinatorHttpError::NotFound(format!("incident not found: {id}")))
}

/// `GET /api/graph/resources`.
pub async fn resources(State(state): State<AppState>) -> Json<Vec<ResourceNode>> {
    let snapshot = state.coordinator.snapshot().await;
    Json(snapshot.resources.into_values().collect())
}

/// `GET /api/graph/stats` -- all-zeros on an empty graph.
pub async fn stats(State(state): State<AppState>) -> Json<GraphStats> {
    let snapshot = state.coordinator.snapshot().await;
    Json(GraphStats {
        incidents: snapshot.incidents.len(),
        active_incidents: snapshot.active_incidents().len(),
        resources: snapshot.resources.len(),
        available_resources: snapshot.available_resources().len(),
        locations: snapshot.locations.len(),
        contradictions: snapshot.contradictions.len(),
        open_contradictions: snapshot.contradictions.values().filter(|c| c.is_open()).count(),
        pending_actions: snapshot.actions.values().filter(|a| a.status == ActionStatus::Pending).count(),
        camps: snapshot.camps.len(),
        voice_reports: snapshot.voice_reports.len(),
    })
}
