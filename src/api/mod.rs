/// HTTP API Layer
///
/// REST endpoints over the workflow engine:
/// - Workflow definition create/get/list
/// - Instance start/get/list and action execution
/// - Mapping of engine errors to HTTP responses

// Error-to-response mapping shared by all handlers
pub mod error;

// Workflow definition endpoints (/api/workflows)
pub mod workflows;

// Instance endpoints (/api/instances)
pub mod instances;

use crate::runtime::WorkflowEngine;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Engine owning the definition and instance stores
    pub engine: WorkflowEngine,
}

// Re-export router builders
pub use error::ApiError;
pub use instances::create_instance_routes;
pub use workflows::create_workflow_routes;
