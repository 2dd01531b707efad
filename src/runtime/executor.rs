/// Transition rules for workflow instances
///
/// Pure functions over a definition and an instance: the engine resolves the
/// instance and its definition (steps 1 and 2 of the pipeline) and hands them
/// here. Everything is checked before the instance is touched, so a failed
/// call leaves it exactly as it was.
///
/// `State::enabled` is deliberately not consulted. Only the action's own
/// `enabled` flag and the current state's `is_final` flag gate a transition.

use crate::error::EngineError;
use crate::runtime::instance::{HistoryEntry, WorkflowInstance};
use crate::workflow::types::{Action, WorkflowDefinition};
use chrono::{DateTime, Utc};

/// Create a new instance of `definition` positioned at its initial state
pub fn instantiate(
    definition: &WorkflowDefinition,
    now: DateTime<Utc>,
) -> Result<WorkflowInstance, EngineError> {
    let initial = definition
        .initial_state()
        .ok_or_else(|| EngineError::InitialStateNotFound(definition.id.clone()))?;

    Ok(WorkflowInstance::start(&definition.id, &initial.id, now))
}

/// Decide whether `action_id` may fire on `instance` right now
///
/// Checks, in order: action exists, action enabled, current state exists,
/// current state not final, action departs from the current state, target
/// state exists.
pub fn resolve_transition<'a>(
    definition: &'a WorkflowDefinition,
    instance: &WorkflowInstance,
    action_id: &str,
) -> Result<&'a Action, EngineError> {
    let action = definition
        .action(action_id)
        .ok_or_else(|| EngineError::ActionNotFound(action_id.to_string()))?;

    if !action.enabled {
        return Err(EngineError::ActionDisabled(action.id.clone()));
    }

    let current = definition
        .state(&instance.current_state_id)
        .ok_or_else(|| EngineError::CurrentStateNotFound(instance.current_state_id.clone()))?;

    if current.is_final {
        return Err(EngineError::InstanceIsFinal(current.id.clone()));
    }

    if !action.from_states.iter().any(|from| *from == current.id) {
        return Err(EngineError::InvalidTransition {
            action_id: action.id.clone(),
            state_id: current.id.clone(),
        });
    }

    if definition.state(&action.to_state).is_none() {
        return Err(EngineError::TargetStateNotFound(action.to_state.clone()));
    }

    Ok(action)
}

/// Fire `action_id` on `instance`, recording the transition in its history
pub fn fire(
    definition: &WorkflowDefinition,
    instance: &mut WorkflowInstance,
    action_id: &str,
    now: DateTime<Utc>,
) -> Result<HistoryEntry, EngineError> {
    let action = resolve_transition(definition, instance, action_id)?;

    let entry = HistoryEntry {
        action_id: action.id.clone(),
        action_name: action.name.clone(),
        from_state_id: instance.current_state_id.clone(),
        to_state_id: action.to_state.clone(),
        timestamp: now,
    };

    instance.history.push(entry.clone());
    instance.current_state_id = action.to_state.clone();
    instance.last_modified = now;

    Ok(entry)
}

/// Actions that `fire` would currently accept, in declaration order
pub fn available_actions<'a>(
    definition: &'a WorkflowDefinition,
    instance: &WorkflowInstance,
) -> Vec<&'a Action> {
    definition
        .actions
        .iter()
        .filter(|action| resolve_transition(definition, instance, &action.id).is_ok())
        .collect()
}
