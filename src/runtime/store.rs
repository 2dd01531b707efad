/// Concurrent store of running workflow instances
///
/// The map itself lives behind an ArcSwap like the definition registry, and
/// every instance sits behind its own async mutex. Executing an action locks
/// only the instance it touches, so work on different instances never
/// contends while work on the same instance is serialized.

use crate::runtime::instance::WorkflowInstance;
use arc_swap::ArcSwap;
use indexmap::IndexMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handle to a single instance
pub type InstanceHandle = Arc<Mutex<WorkflowInstance>>;

#[derive(Debug)]
pub struct InstanceStore {
    instances: ArcSwap<IndexMap<String, InstanceHandle>>,
}

impl InstanceStore {
    pub fn new() -> Self {
        Self {
            instances: ArcSwap::new(Arc::new(IndexMap::new())),
        }
    }

    /// Build a store pre-populated with instances read from a snapshot
    pub fn from_instances(instances: impl IntoIterator<Item = WorkflowInstance>) -> Self {
        let map: IndexMap<_, _> = instances
            .into_iter()
            .map(|instance| (instance.id.clone(), Arc::new(Mutex::new(instance))))
            .collect();

        Self {
            instances: ArcSwap::new(Arc::new(map)),
        }
    }

    /// Add a new instance
    pub fn insert(&self, instance: WorkflowInstance) -> InstanceHandle {
        let id = instance.id.clone();
        let handle = Arc::new(Mutex::new(instance));

        self.instances.rcu(|current| {
            let mut next = IndexMap::clone(current);
            next.insert(id.clone(), Arc::clone(&handle));
            next
        });

        handle
    }

    /// Lockable handle for an instance, if it exists
    pub fn handle(&self, instance_id: &str) -> Option<InstanceHandle> {
        self.instances.load().get(instance_id).cloned()
    }

    /// Point-in-time copy of one instance
    pub async fn get(&self, instance_id: &str) -> Option<WorkflowInstance> {
        let handle = self.handle(instance_id)?;
        let instance = handle.lock().await;
        Some(instance.clone())
    }

    /// Copies of every instance in creation order
    pub async fn list(&self) -> Vec<WorkflowInstance> {
        let handles: Vec<InstanceHandle> = self.instances.load().values().cloned().collect();

        let mut instances = Vec::with_capacity(handles.len());
        for handle in handles {
            instances.push(handle.lock().await.clone());
        }
        instances
    }

    pub fn len(&self) -> usize {
        self.instances.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.load().is_empty()
    }
}

impl Default for InstanceStore {
    fn default() -> Self {
        Self::new()
    }
}
