/// Running workflow instances and their transition history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Action id recorded for the synthetic entry every instance starts with
pub const START_ACTION_ID: &str = "START";

/// One recorded transition
///
/// The synthetic start entry has an empty `from_state_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub action_id: String,
    pub action_name: String,
    pub from_state_id: String,
    pub to_state_id: String,
    pub timestamp: DateTime<Utc>,
}

/// One running execution of a workflow definition
///
/// The instance refers to its definition by id only; the definition is looked
/// up again on every operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowInstance {
    /// Generated UUID
    pub id: String,
    pub definition_id: String,
    pub current_state_id: String,
    /// Append-only, oldest first
    pub history: Vec<HistoryEntry>,
    pub last_modified: DateTime<Utc>,
}

impl WorkflowInstance {
    /// New instance sitting in `initial_state_id`, seeded with the START entry
    pub fn start(definition_id: &str, initial_state_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            definition_id: definition_id.to_string(),
            current_state_id: initial_state_id.to_string(),
            history: vec![HistoryEntry {
                action_id: START_ACTION_ID.to_string(),
                action_name: START_ACTION_ID.to_string(),
                from_state_id: String::new(),
                to_state_id: initial_state_id.to_string(),
                timestamp: now,
            }],
            last_modified: now,
        }
    }
}
