use axum::extract::{Path, State};
use axum::Json;

use aegis_core::AllocationPlan;

use super::schemas::{ApproveInput, AssignResourceInput, UnassignResourceInput};
use super::AppState;
use crate::error::CoordinatorHttpError;

/// `POST /api/resources/assign` -- manual `(resource, incident)` assignment.
pub async fn assign(
    State(state): State<AppState>,
    Json(input): Json<AssignResourceInput>,
) -> Result<Json<serde_json::Value>, CoordinatorHttpError> {
    state.coordinator.assign_resource_manual(&input.resource_id, &input.incident_id).await?;
    Ok(Json(serde_json::json!({ "resource_id": input.resource_id, "status": "dispatched" })))
}

/// `POST /api/resources/unassign/{id}` -- reverses a manual assignment.
pub async fn unassign(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UnassignResourceInput>,
) -> Result<Json<serde_json::Value>, CoordinatorHttpError> {
    state.coordinator.unassign_resource(&id, &input.incident_id).await?;
    Ok(Json(serde_json::json!({ "resource_id": id, "status": "available" })))
}

/// `POST /api/resources/generate-plan` -- calls the Allocation analyzer
/// and materializes one plan (plus its camp recommendations).
pub async fn generate_plan(State(state): State<AppState>) -> Json<AllocationPlan> {
    let outcome = state.coordinator.generate_allocation_plan().await;
    Json(outcome.plan)
}

/// `POST /api/resources/plans/{id}/approve`.
pub async fn approve_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ApproveInput>,
) -> Result<Json<serde_json::Value>, CoordinatorHttpError> {
    state.coordinator.approve_allocation_plan(&id, &input.decided_by).await?;
    Ok(Json(serde_json::json!({ "plan_id": id, "status": "approved" })))
}
