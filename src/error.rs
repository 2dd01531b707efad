/// Error types raised by the workflow core
///
/// Every failure carries a stable machine-readable `code()` alongside its
/// human-readable message. None of them are retryable.

use thiserror::Error;

/// Reasons a proposed workflow definition is rejected.
///
/// Variants are listed in the order the validator checks them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("workflow name must not be empty")]
    EmptyName,

    #[error("workflow must declare at least one state")]
    NoStates,

    #[error("workflow actions must be provided")]
    MissingActions,

    #[error("duplicate state id '{0}'")]
    DuplicateStateId(String),

    #[error("duplicate action id '{0}'")]
    DuplicateActionId(String),

    #[error("workflow must have exactly one initial state, found {0}")]
    InitialStateCount(usize),

    #[error("action '{action_id}' references unknown from-state '{state_id}'")]
    UnknownFromState { action_id: String, state_id: String },

    #[error("action '{action_id}' references unknown to-state '{state_id}'")]
    UnknownToState { action_id: String, state_id: String },
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::EmptyName => "empty_name",
            ValidationError::NoStates => "no_states",
            ValidationError::MissingActions => "missing_actions",
            ValidationError::DuplicateStateId(_) => "duplicate_state_id",
            ValidationError::DuplicateActionId(_) => "duplicate_action_id",
            ValidationError::InitialStateCount(_) => "initial_state_count",
            ValidationError::UnknownFromState { .. } => "unknown_from_state",
            ValidationError::UnknownToState { .. } => "unknown_to_state",
        }
    }
}

/// Failures of engine operations (create, start, execute).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Definition rejected by the validator
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("workflow definition '{0}' not found")]
    DefinitionNotFound(String),

    #[error("workflow instance '{0}' not found")]
    InstanceNotFound(String),

    #[error("action '{0}' not found in workflow definition")]
    ActionNotFound(String),

    #[error("action '{0}' is disabled")]
    ActionDisabled(String),

    /// Internal consistency: the instance points at a state its definition lacks
    #[error("current state '{0}' not found in workflow definition")]
    CurrentStateNotFound(String),

    #[error("instance is in final state '{0}'; no further actions are allowed")]
    InstanceIsFinal(String),

    #[error("action '{action_id}' cannot be executed from state '{state_id}'")]
    InvalidTransition { action_id: String, state_id: String },

    /// Internal consistency: the action targets a state its definition lacks
    #[error("target state '{0}' not found in workflow definition")]
    TargetStateNotFound(String),

    /// Internal consistency: the definition has no initial state
    #[error("workflow definition '{0}' has no initial state")]
    InitialStateNotFound(String),
}

impl EngineError {
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Validation(e) => e.code(),
            EngineError::DefinitionNotFound(_) => "definition_not_found",
            EngineError::InstanceNotFound(_) => "instance_not_found",
            EngineError::ActionNotFound(_) => "action_not_found",
            EngineError::ActionDisabled(_) => "action_disabled",
            EngineError::CurrentStateNotFound(_) => "current_state_not_found",
            EngineError::InstanceIsFinal(_) => "instance_is_final",
            EngineError::InvalidTransition { .. } => "invalid_transition",
            EngineError::TargetStateNotFound(_) => "target_state_not_found",
            EngineError::InitialStateNotFound(_) => "initial_state_not_found",
        }
    }
}
