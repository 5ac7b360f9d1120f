use axum::extract::State;
use axum::Json;
use serde_json::json;

use super::AppState;

/// `GET /api/health` -- liveness only; the coordinator is always ready
/// once the process is up (it has no external connections to fail).
pub async fn health(State(_state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
