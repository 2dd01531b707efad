/// Server setup and initialization
///
/// Wires together snapshot storage, the workflow engine and the HTTP routes.
/// Provides the application factory used by `main` and by the API tests.

use crate::{
    api::{create_instance_routes, create_workflow_routes, AppState},
    config::Config,
    runtime::WorkflowEngine,
    workflow::storage::SnapshotStorage,
};
use anyhow::Result;
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

/// Build the Axum application around an existing engine
pub fn create_app(engine: WorkflowEngine) -> Router {
    let app_state = AppState { engine };

    Router::new()
        // Health check endpoint
        .route("/healthz", get(health_check))
        // Workflow definition API routes
        .merge(create_workflow_routes())
        // Instance API routes
        .merge(create_instance_routes())
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server with the given configuration
///
/// Loads the snapshot, serves until Ctrl-C/SIGTERM, then writes a final snapshot.
pub async fn start_server(config: Config) -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    tracing::info!("Starting Stateway server...");

    tracing::info!("📋 Loading workflow snapshot from {}", config.storage.data_file.display());
    let storage = SnapshotStorage::new(&config.storage.data_file);
    let engine = WorkflowEngine::with_storage(storage).await;

    let app = create_app(engine.clone());

    let bind_addr = config.bind_address();
    let listener = TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("💾 Writing final snapshot");
    if let Err(e) = engine.flush().await {
        tracing::error!("❌ Failed to write final snapshot: {:#}", e);
    }

    Ok(())
}

/// Health check endpoint handler
async fn health_check() -> &'static str {
    "ok"
}

/// Resolves on Ctrl-C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
