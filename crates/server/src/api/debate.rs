use aegis_core::DebateTurn;
use axum::extract::{Path, State};
use axum::Json;

use super::AppState;
use crate::error::CoordinatorHttpError;

/// `POST /api/debate/{alert_id}/start` -- runs the staged four-turn debate.
pub async fn start(State(state): State<AppState>, Path(alert_id): Path<String>) -> Result<Json<Vec<DebateTurn>>, CoordinatorHttpError> {
    let turns = state.coordinator.start_debate(&alert_id).await?;
    Ok(Json(turns))
}
