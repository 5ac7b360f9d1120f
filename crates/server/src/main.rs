use std::sync::Arc;

use aegis_analyzer::NullOracle;
use aegis_audit_memory::InMemoryAuditStore;
use aegis_coordinator::CoordinatorBuilder;
use aegis_server::api::AppState;
use aegis_server::config::Settings;
use aegis_simulation::SimulationDriver;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    aegis_server::telemetry::init();

    let settings = Arc::new(Settings::from_env());

    let coordinator = Arc::new(
        CoordinatorBuilder::new()
            .oracle(Arc::new(NullOracle))
            .audit_store(Arc::new(InMemoryAuditStore::new()))
            .build(),
    );
    let driver = Arc::new(SimulationDriver::new(Arc::clone(&coordinator)));

    let state = AppState {
        coordinator,
        driver,
        settings: Arc::clone(&settings),
    };
    let app = aegis_server::build_router(state);

    let addr = format!("0.0.0.0:{}", settings.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "aegis-server listening");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("aegis-server shut down");
    Ok(())
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever arrives first.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("received SIGINT"); }
        () = terminate => { info!("received SIGTERM"); }
    }
}
