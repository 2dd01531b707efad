/// Stateway: state-machine workflows over HTTP
///
/// Main entry point. Loads configuration from the environment and starts the
/// HTTP server.

use stateway::{config::Config, server::start_server};

/// Application entry point
///
/// The server provides:
/// - Workflow definition API at /api/workflows/*
/// - Instance API at /api/instances/*
/// - Health check at /healthz
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration (defaults to 0.0.0.0:3004 and data/workflows.json)
    let config = Config::default();

    start_server(config).await?;

    Ok(())
}
