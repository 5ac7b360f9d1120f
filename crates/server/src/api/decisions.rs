use axum::extract::{Path, State};
use axum::Json;

use super::schemas::{ApproveInput, HumanDecision, PendingDecisions};
use super::AppState;
use crate::error::CoordinatorHttpError;

/// `GET /api/decisions/pending` -- unresolved contradictions and pending actions.
pub async fn pending(State(state): State<AppState>) -> Json<PendingDecisions> {
    let snapshot = state.coordinator.snapshot().await;
    Json(PendingDecisions {
        contradictions: snapshot.contradictions.into_values().filter(|c| c.is_open()).collect(),
        actions: snapshot.actions.into_values().filter(|a| !a.is_decided()).collect(),
    })
}

/// `POST /api/decisions/contradiction/{id}` -- resolve with a `HumanDecision` body.
pub async fn resolve_contradiction(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(decision): Json<HumanDecision>,
) -> Result<Json<serde_json::Value>, CoordinatorHttpError> {
    state.coordinator.resolve_contradiction(&id, &decision.decision, &decision.decided_by).await?;
    Ok(Json(serde_json::json!({ "decision_id": id, "resolved": true })))
}

/// `POST /api/decisions/action/{id}/approve`.
pub async fn approve_action(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ApproveInput>,
) -> Result<Json<serde_json::Value>, CoordinatorHttpError> {
    state.coordinator.approve_action(&id, &input.decided_by).await?;
    Ok(Json(serde_json::json!({ "decision_id": id, "status": "approved" })))
}

/// `POST /api/decisions/action/{id}/reject`.
pub async fn reject_action(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ApproveInput>,
) -> Result<Json<serde_json::Value>, CoordinatorHttpError> {
    state.coordinator.reject_action(&id, &input.decided_by).await?;
    Ok(Json(serde_json::json!({ "decision_id": id, "status": "rejected" })))
}
