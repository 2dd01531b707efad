/// Runtime Execution Layer
///
/// This module drives workflow instances:
/// - Instance and history types
/// - Transition rules (start, execute, available actions)
/// - Per-instance locked store
/// - Engine facade tying definitions, instances and persistence together

// Instance and history types
pub mod instance;

// Transition rules over a definition and an instance
pub mod executor;

// Concurrent instance store
pub mod store;

// Engine facade used by the API layer
pub mod engine;

// Re-export main types
pub use engine::WorkflowEngine;
pub use instance::{HistoryEntry, WorkflowInstance};
