/// Configuration management for the Stateway service
///
/// Handles server binding and snapshot file location.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Snapshot storage configuration
    pub storage: StorageConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Server port number
    pub port: u16,
}

/// Snapshot storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding every definition and instance (default: "data/workflows.json")
    pub data_file: PathBuf,
}

impl Config {
    /// `host:port` string for binding the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Config {
    /// Default configuration with ENV_VAR support for container deployment
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: std::env::var("STATEWAY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("STATEWAY_PORT")
                    .ok()
                    .and_then(|port| port.parse().ok())
                    .unwrap_or(3004),
            },
            storage: StorageConfig {
                data_file: std::env::var("STATEWAY_DATA_FILE")
                    .unwrap_or_else(|_| "data/workflows.json".to_string())
                    .into(),
            },
        }
    }
}
