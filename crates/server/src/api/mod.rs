//! Axum route table: a thin adapter over `Coordinator` and
//! `SimulationDriver`. Every handler either reads a snapshot or calls
//! exactly one coordinator method; no business logic lives here.

pub mod audit;
pub mod camps;
pub mod copilot;
pub mod debate;
pub mod decisions;
pub mod graph;
pub mod health;
pub mod resources;
pub mod schemas;
pub mod signals;
pub mod simulation;
pub mod voice;
pub mod ws;

use std::sync::Arc;

use aegis_coordinator::Coordinator;
use aegis_simulation::SimulationDriver;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<Coordinator>,
    pub driver: Arc<SimulationDriver>,
    pub settings: Arc<Settings>,
}

#[must_use]
pub fn build_router(state: AppState) -> Router {
    let cors = build_cors(&state.settings.cors_origins);

    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/graph", get(graph::graph))
        .route("/api/graph/incidents", get(graph::incidents))
        .route("/api/graph/incidents/{id}", get(graph::incident))
        .route("/api/graph/resources", get(graph::resources))
        .route("/api/graph/stats", get(graph::stats))
        .route("/api/signals/image", post(signals::ingest_image))
        .route("/api/signals/audio", post(signals::ingest_audio))
        .route("/api/signals/text", post(signals::ingest_text))
        .route("/api/decisions/pending", get(decisions::pending))
        .route("/api/decisions/contradiction/{id}", post(decisions::resolve_contradiction))
        .route("/api/decisions/action/{id}/approve", post(decisions::approve_action))
        .route("/api/decisions/action/{id}/reject", post(decisions::reject_action))
        .route("/api/simulation/start", post(simulation::start))
        .route("/api/simulation/pause", post(simulation::pause))
        .route("/api/simulation/resume", post(simulation::resume))
        .route("/api/simulation/reset", post(simulation::reset))
        .route("/api/simulation/status", get(simulation::status))
        .route("/api/audit/decision/{id}", get(audit::decision))
        .route("/api/audit/incident/{id}", get(audit::incident))
        .route("/api/timeline", get(audit::timeline))
        .route("/api/debate/{alert_id}/start", post(debate::start))
        .route("/api/resources/assign", post(resources::assign))
        .route("/api/resources/unassign/{id}", post(resources::unassign))
        .route("/api/resources/generate-plan", post(resources::generate_plan))
        .route("/api/resources/plans/{id}/approve", post(resources::approve_plan))
        .route("/api/camps/generate", post(camps::generate))
        .route("/api/camps/{id}/approve", post(camps::approve))
        .route("/api/camps/{id}/reject", post(camps::reject))
        .route("/api/camps", get(camps::list))
        .route("/api/copilot/ask", post(copilot::ask))
        .route("/api/voice/report", get(voice::latest_report))
        .route("/api/voice/reports", get(voice::reports))
        .route("/api/voice/transcribe", post(voice::transcribe))
        .route("/api/voice/synthesize", post(voice::synthesize))
        .route("/ws", get(ws::ws_handler))
        .layer(cors)
        .with_state(state)
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let allowed: Vec<_> = origins.iter().filter_map(|origin| origin.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

#[cfg(test)]
mod tests {
    use aegis_analyzer::NullOracle;
    use aegis_audit_memory::InMemoryAuditStore;
    use aegis_coordinator::CoordinatorBuilder;
    use axum_test::TestServer;
    use serde_json::json;

    use super::*;
    use crate::config::Settings;

    fn test_server() -> TestServer {
        let coordinator = Arc::new(CoordinatorBuilder::new().oracle(Arc::new(NullOracle)).audit_store(Arc::new(InMemoryAuditStore::new())).build());
        let driver = Arc::new(SimulationDriver::new(Arc::clone(&coordinator)));
        let settings = Arc::new(Settings {
            gemini_api_key: None,
            elevenlabs_api_key: None,
            cors_origins: vec!["http://localhost:5173".to_string()],
            simulation_speed: 1.0,
            port: 8080,
        });
        let state = AppState { coordinator, driver, settings };
        TestServer::new(build_router(state)).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let server = test_server();
        let response = server.get("/api/health").await;
        response.assert_status_ok();
        response.assert_json(&json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn stats_are_all_zero_on_an_empty_graph() {
        let server = test_server();
        let response = server.get("/api/graph/stats").await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["incidents"], 0);
        assert_eq!(body["pending_actions"], 0);
    }

    #[tokio::test]
    async fn text_signal_ingestion_does_not_create_an_incident() {
        let server = test_server();
        let response = server
            .post("/api/signals/text")
            .json(&json!({ "content": "bridge may be down", "metadata": {} }))
            .await;
        response.assert_status_ok();

        let stats = server.get("/api/graph/stats").await;
        let body: serde_json::Value = stats.json();
        assert_eq!(body["incidents"], 0);
    }

    #[tokio::test]
    async fn unknown_incident_id_returns_404() {
        let server = test_server();
        let response = server.get("/api/graph/incidents/does-not-exist").await;
        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn pending_decisions_start_empty() {
        let server = test_server();
        let response = server.get("/api/decisions/pending").await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert!(body["contradictions"].as_array().unwrap().is_empty());
        assert!(body["actions"].as_array().unwrap().is_empty());
    }
}
