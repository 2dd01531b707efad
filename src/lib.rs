/// Stateway: named state-machine workflows with validated definitions
///
/// Definitions (states + actions) are validated once and never change.
/// Instances of a definition are driven forward one action at a time, each
/// transition recorded in an append-only history.

// Core configuration and setup
pub mod config;

// Error taxonomy shared by the core and the API layer
pub mod error;

// Workflow definition layer - types, validation, registry and snapshot storage
pub mod workflow;

// Runtime layer - instances, transition rules, instance store and engine facade
pub mod runtime;

// HTTP API layer - REST endpoints for definitions and instances
pub mod api;

// Server setup and initialization
pub mod server;

// Re-export commonly used types for external consumers
pub use error::{EngineError, ValidationError};
pub use runtime::{HistoryEntry, WorkflowEngine, WorkflowInstance};
pub use server::{create_app, start_server};
pub use workflow::{Action, State, WorkflowDefinition};
