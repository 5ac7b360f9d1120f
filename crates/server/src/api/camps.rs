use axum::extract::{Path, State};
use axum::Json;

use aegis_core::CampRecommendation;

use super::schemas::ApproveInput;
use super::AppState;
use crate::error::CoordinatorHttpError;

/// `POST /api/camps/generate` -- calls the Allocation analyzer and
/// returns the camp recommendations it produces alongside its plan.
pub async fn generate(State(state): State<AppState>) -> Json<Vec<CampRecommendation>> {
    Json(state.coordinator.generate_camp_recommendations().await)
}

/// `POST /api/camps/{id}/approve`.
pub async fn approve(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ApproveInput>,
) -> Result<Json<serde_json::Value>, CoordinatorHttpError> {
    state.coordinator.approve_camp(&id, &input.decided_by).await?;
    Ok(Json(serde_json::json!({ "camp_id": id, "status": "approved" })))
}

/// `POST /api/camps/{id}/reject`.
pub async fn reject(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ApproveInput>,
) -> Result<Json<serde_json::Value>, CoordinatorHttpError> {
    state.coordinator.reject_camp(&id, &input.decided_by).await?;
    Ok(Json(serde_json::json!({ "camp_id": id, "status": "rejected" })))
}

/// `GET /api/camps` -- every camp recommendation on the graph.
pub async fn list(State(state): State<AppState>) -> Json<Vec<CampRecommendation>> {
    let snapshot = state.coordinator.snapshot().await;
    Json(snapshot.camps.into_values().collect())
}
