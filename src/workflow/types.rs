/// Core workflow definition types
///
/// Defines the static description of a state machine: its states, the actions
/// (transition rules) between them, and the immutable definition that bundles both.
/// These types are serialized with lower-camel-case field names for the HTTP API
/// and the JSON snapshot file.

use serde::{Deserialize, Serialize};

/// A single state of a workflow definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    /// Unique state identifier within the definition (e.g., "draft")
    pub id: String,
    /// Human-readable state name
    #[serde(default)]
    pub name: String,
    /// Whether new instances start in this state (exactly one per definition)
    #[serde(default)]
    pub is_initial: bool,
    /// Whether reaching this state ends the instance's ability to fire actions
    #[serde(default)]
    pub is_final: bool,
    /// Informational flag; the executor never consults it
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A named, directed transition rule
///
/// An action may fire from any state listed in `from_states` and always lands
/// in `to_state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    /// Unique action identifier within the definition (e.g., "submit")
    pub id: String,
    /// Human-readable action name, copied into history entries
    #[serde(default)]
    pub name: String,
    /// State ids this action may depart from
    #[serde(default)]
    pub from_states: Vec<String>,
    /// Destination state id; left empty when omitted, which fails validation
    #[serde(default)]
    pub to_state: String,
    /// Disabled actions are rejected at execution time
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// An immutable, validated workflow definition
///
/// Only the validator produces these (or the snapshot loader, after re-checking
/// them). There is no update or delete operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDefinition {
    /// Generated UUID
    pub id: String,
    pub name: String,
    /// States in declaration order
    pub states: Vec<State>,
    /// Actions in declaration order
    pub actions: Vec<Action>,
}

impl WorkflowDefinition {
    /// Look up a state by id
    pub fn state(&self, state_id: &str) -> Option<&State> {
        self.states.iter().find(|state| state.id == state_id)
    }

    /// Look up an action by id
    pub fn action(&self, action_id: &str) -> Option<&Action> {
        self.actions.iter().find(|action| action.id == action_id)
    }

    /// The state every new instance starts in
    pub fn initial_state(&self) -> Option<&State> {
        self.states.iter().find(|state| state.is_initial)
    }
}

fn default_enabled() -> bool {
    true
}
