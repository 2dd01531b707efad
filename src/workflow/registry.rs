/// Lock-free registry of workflow definitions using ArcSwap
///
/// Definitions are immutable once registered, so readers only ever need a
/// cheap `Arc` clone. Inserts swap in a new map with `rcu`, which retries if a
/// concurrent insert landed first.

use crate::workflow::types::WorkflowDefinition;
use arc_swap::ArcSwap;
use indexmap::IndexMap;
use std::sync::Arc;

/// In-memory store of every known definition, keyed by id
///
/// Iteration order is registration order.
#[derive(Debug)]
pub struct DefinitionRegistry {
    definitions: ArcSwap<IndexMap<String, Arc<WorkflowDefinition>>>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self {
            definitions: ArcSwap::new(Arc::new(IndexMap::new())),
        }
    }

    /// Build a registry pre-populated with already validated definitions
    pub fn from_definitions(definitions: impl IntoIterator<Item = WorkflowDefinition>) -> Self {
        let map: IndexMap<_, _> = definitions
            .into_iter()
            .map(|definition| (definition.id.clone(), Arc::new(definition)))
            .collect();

        Self {
            definitions: ArcSwap::new(Arc::new(map)),
        }
    }

    /// Register a definition and hand back the shared handle
    pub fn insert(&self, definition: WorkflowDefinition) -> Arc<WorkflowDefinition> {
        let definition = Arc::new(definition);

        self.definitions.rcu(|current| {
            let mut next = IndexMap::clone(current);
            next.insert(definition.id.clone(), Arc::clone(&definition));
            next
        });

        definition
    }

    /// Get a definition by id (lock-free read)
    pub fn get(&self, definition_id: &str) -> Option<Arc<WorkflowDefinition>> {
        self.definitions.load().get(definition_id).cloned()
    }

    /// All definitions in registration order
    pub fn list(&self) -> Vec<Arc<WorkflowDefinition>> {
        self.definitions.load().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.load().is_empty()
    }
}

impl Default for DefinitionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
