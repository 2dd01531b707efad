/// Structural validation of proposed workflow definitions
///
/// Rules run in a fixed order and the first failure wins:
/// 1. non-empty name (ignoring surrounding whitespace)
/// 2. at least one state
/// 3. actions present (an empty list is fine)
/// 4. unique state ids
/// 5. unique action ids
/// 6. exactly one initial state
/// 7. every `fromStates` entry and every `toState` names a declared state
///
/// No graph analysis happens here: unreachable states, cycles and actions
/// leaving final states are all accepted.

use crate::error::ValidationError;
use crate::workflow::types::{Action, State, WorkflowDefinition};
use std::collections::HashSet;
use uuid::Uuid;

/// Validate a candidate definition and build it with a fresh id
///
/// The returned definition owns its own copies of `states` and `actions`.
pub fn validate(
    name: &str,
    states: &[State],
    actions: Option<&[Action]>,
) -> Result<WorkflowDefinition, ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if states.is_empty() {
        return Err(ValidationError::NoStates);
    }
    let actions = actions.ok_or(ValidationError::MissingActions)?;

    check_structure(states, actions)?;

    Ok(WorkflowDefinition {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        states: states.to_vec(),
        actions: actions.to_vec(),
    })
}

/// Re-check a definition that did not come through `validate`, e.g. one read
/// back from a snapshot file
pub fn revalidate(definition: &WorkflowDefinition) -> Result<(), ValidationError> {
    if definition.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if definition.states.is_empty() {
        return Err(ValidationError::NoStates);
    }
    check_structure(&definition.states, &definition.actions)
}

/// Rules 4-7
fn check_structure(states: &[State], actions: &[Action]) -> Result<(), ValidationError> {
    let mut state_ids = HashSet::with_capacity(states.len());
    for state in states {
        if !state_ids.insert(state.id.as_str()) {
            return Err(ValidationError::DuplicateStateId(state.id.clone()));
        }
    }

    let mut action_ids = HashSet::with_capacity(actions.len());
    for action in actions {
        if !action_ids.insert(action.id.as_str()) {
            return Err(ValidationError::DuplicateActionId(action.id.clone()));
        }
    }

    let initial_count = states.iter().filter(|state| state.is_initial).count();
    if initial_count != 1 {
        return Err(ValidationError::InitialStateCount(initial_count));
    }

    for action in actions {
        if let Some(unknown) = action
            .from_states
            .iter()
            .find(|from| !state_ids.contains(from.as_str()))
        {
            return Err(ValidationError::UnknownFromState {
                action_id: action.id.clone(),
                state_id: unknown.clone(),
            });
        }
        if !state_ids.contains(action.to_state.as_str()) {
            return Err(ValidationError::UnknownToState {
                action_id: action.id.clone(),
                state_id: action.to_state.clone(),
            });
        }
    }

    Ok(())
}
