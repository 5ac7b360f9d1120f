use axum::extract::State;
use axum::Json;

use aegis_coordinator::SimulationStatus;

use super::schemas::StartSimulationInput;
use super::AppState;

/// `POST /api/simulation/start`.
pub async fn start(State(state): State<AppState>, Json(input): Json<StartSimulationInput>) -> Json<SimulationStatus> {
    let speed = input.speed.unwrap_or(state.settings.simulation_speed);
    state.driver.start(&input.scenario_id, speed).await;
    Json(state.coordinator.simulation_status().await)
}

/// `POST /api/simulation/pause`.
pub async fn pause(State(state): State<AppState>) -> Json<SimulationStatus> {
    state.driver.pause().await;
    Json(state.coordinator.simulation_status().await)
}

/// `POST /api/simulation/resume`.
pub async fn resume(State(state): State<AppState>) -> Json<SimulationStatus> {
    state.driver.resume().await;
    Json(state.coordinator.simulation_status().await)
}

/// `POST /api/simulation/reset`.
pub async fn reset(State(state): State<AppState>) -> Json<SimulationStatus> {
    state.driver.reset().await;
    Json(state.coordinator.simulation_status().await)
}

/// `GET /api/simulation/status`.
pub async fn status(State(state): State<AppState>) -> Json<SimulationStatus> {
    Json(state.coordinator.simulation_status().await)
}
