/// Workflow Definition Layer
///
/// This module handles the static side of a workflow:
/// - Type definitions (State, Action, WorkflowDefinition)
/// - Structural validation of proposed definitions
/// - Lock-free registry of validated definitions using ArcSwap
/// - JSON snapshot persistence

// Core workflow type definitions
pub mod types;

// Definition validation rules
pub mod validator;

// Lock-free definition registry
pub mod registry;

// JSON snapshot persistence
pub mod storage;

// Re-export commonly used types
pub use types::{Action, State, WorkflowDefinition};
