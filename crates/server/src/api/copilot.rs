use axum::extract::State;
use axum::Json;

use super::schemas::{CopilotAnswer, CopilotQuestion};
use super::AppState;

/// `POST /api/copilot/ask` -- a conversational query over a textual
/// summary of the current situation graph; not one of the eight
/// modeled analyzer oracles, but a direct, schema-free oracle call.
pub async fn ask(State(state): State<AppState>, Json(input): Json<CopilotQuestion>) -> Json<CopilotAnswer> {
    let answer = state.coordinator.copilot_ask(&input.question).await;
    Json(CopilotAnswer { answer })
}
