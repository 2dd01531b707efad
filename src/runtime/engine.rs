/// Workflow engine facade
///
/// Owns the definition registry and the instance store for the life of the
/// process and exposes the operations the API layer needs. After every
/// successful mutation it signals the background snapshot writer (when
/// persistence is configured); the writer never blocks or fails the caller.

use crate::error::EngineError;
use crate::runtime::executor;
use crate::runtime::instance::WorkflowInstance;
use crate::runtime::store::InstanceStore;
use crate::workflow::registry::DefinitionRegistry;
use crate::workflow::storage::{SnapshotDocument, SnapshotStorage};
use crate::workflow::types::{Action, State, WorkflowDefinition};
use crate::workflow::validator;
use anyhow::Result;
use chrono::Utc;
use std::sync::{Arc, Weak};
use tokio::sync::{watch, Mutex, Notify};
use tokio::task::JoinHandle;

/// Cheaply cloneable handle to the shared engine state
#[derive(Debug, Clone)]
pub struct WorkflowEngine {
    definitions: Arc<DefinitionRegistry>,
    instances: Arc<InstanceStore>,
    persistence: Option<Persistence>,
}

/// Snapshot storage plus the signal that wakes its writer task
#[derive(Debug, Clone)]
struct Persistence {
    storage: SnapshotStorage,
    dirty: Arc<Notify>,
    /// Held across snapshot + write so files land in snapshot order
    write_lock: Arc<Mutex<()>>,
    /// Stored definitions that failed re-validation; written back untouched
    retained: Arc<Vec<WorkflowDefinition>>,
    /// Dropped with the last engine clone, which stops the writer task
    _shutdown: Arc<watch::Sender<()>>,
}

/// Everything the background writer needs, without keeping the engine alive
struct SnapshotWriter {
    storage: SnapshotStorage,
    dirty: Arc<Notify>,
    write_lock: Arc<Mutex<()>>,
    retained: Arc<Vec<WorkflowDefinition>>,
    definitions: Weak<DefinitionRegistry>,
    instances: Weak<InstanceStore>,
    shutdown: watch::Receiver<()>,
}

impl Persistence {
    async fn write(
        &self,
        definitions: &DefinitionRegistry,
        instances: &InstanceStore,
    ) -> Result<()> {
        write_snapshot(
            &self.storage,
            &self.write_lock,
            &self.retained,
            definitions,
            instances,
        )
        .await
    }
}

impl SnapshotWriter {
    /// Rewrite the snapshot each time the engine is marked dirty
    ///
    /// `Notify` keeps at most one pending permit, so a burst of mutations
    /// collapses into a single write of the latest state. Exits once every
    /// engine handle is gone.
    async fn run(mut self) {
        loop {
            tokio::select! {
                _ = self.dirty.notified() => {}
                _ = self.shutdown.changed() => break,
            }

            let (Some(definitions), Some(instances)) =
                (self.definitions.upgrade(), self.instances.upgrade())
            else {
                break;
            };

            let result = write_snapshot(
                &self.storage,
                &self.write_lock,
                &self.retained,
                &definitions,
                &instances,
            )
            .await;
            if let Err(e) = result {
                tracing::error!("❌ Failed to persist snapshot: {:#}", e);
            }
        }

        tracing::debug!("Snapshot writer stopped");
    }
}

impl WorkflowEngine {
    /// Engine without any storage; nothing is ever written to disk
    pub fn in_memory() -> Self {
        Self {
            definitions: Arc::new(DefinitionRegistry::new()),
            instances: Arc::new(InstanceStore::new()),
            persistence: None,
        }
    }

    /// Load the snapshot from `storage` and start the background writer
    ///
    /// A missing snapshot starts empty. An unreadable or malformed one is
    /// logged and also starts empty; loading never fails the process.
    /// Must be called from within a tokio runtime.
    pub async fn with_storage(storage: SnapshotStorage) -> Self {
        let (engine, _writer) = Self::open(storage).await;
        engine
    }

    /// `with_storage`, also returning the writer task's handle
    async fn open(storage: SnapshotStorage) -> (Self, JoinHandle<()>) {
        let document = match storage.load().await {
            Ok(Some(document)) => document,
            Ok(None) => {
                tracing::info!(
                    "📭 No snapshot at {}, starting empty",
                    storage.path().display()
                );
                SnapshotDocument::default()
            }
            Err(e) => {
                tracing::error!("❌ Failed to load snapshot, starting empty: {:#}", e);
                SnapshotDocument::default()
            }
        };

        let (valid, retained): (Vec<_>, Vec<_>) = document
            .definitions
            .into_iter()
            .partition(|definition| match validator::revalidate(definition) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(
                        "⚠️ Not serving stored definition {} (kept on disk as-is): {}",
                        definition.id,
                        e
                    );
                    false
                }
            });

        let (shutdown_tx, shutdown_rx) = watch::channel(());
        let persistence = Persistence {
            storage,
            dirty: Arc::new(Notify::new()),
            write_lock: Arc::new(Mutex::new(())),
            retained: Arc::new(retained),
            _shutdown: Arc::new(shutdown_tx),
        };

        let engine = Self {
            definitions: Arc::new(DefinitionRegistry::from_definitions(valid)),
            instances: Arc::new(InstanceStore::from_instances(document.instances)),
            persistence: Some(persistence.clone()),
        };

        tracing::info!(
            "📥 Loaded {} definitions and {} instances",
            engine.definitions.len(),
            engine.instances.len()
        );

        let writer = SnapshotWriter {
            storage: persistence.storage,
            dirty: persistence.dirty,
            write_lock: persistence.write_lock,
            retained: persistence.retained,
            definitions: Arc::downgrade(&engine.definitions),
            instances: Arc::downgrade(&engine.instances),
            shutdown: shutdown_rx,
        };
        let handle = tokio::spawn(writer.run());

        (engine, handle)
    }

    /// Validate and register a new definition
    pub fn create_definition(
        &self,
        name: &str,
        states: &[State],
        actions: Option<&[Action]>,
    ) -> Result<Arc<WorkflowDefinition>, EngineError> {
        let definition = validator::validate(name, states, actions).map_err(|e| {
            tracing::warn!("Rejected workflow definition '{}': {}", name, e);
            e
        })?;

        let definition = self.definitions.insert(definition);
        tracing::info!(
            "🔥 Created workflow definition: {} ({}) with {} states, {} actions",
            definition.id,
            definition.name,
            definition.states.len(),
            definition.actions.len()
        );

        self.mark_dirty();
        Ok(definition)
    }

    pub fn definition(&self, definition_id: &str) -> Option<Arc<WorkflowDefinition>> {
        self.definitions.get(definition_id)
    }

    pub fn definitions(&self) -> Vec<Arc<WorkflowDefinition>> {
        self.definitions.list()
    }

    /// Create a new instance of a definition at its initial state
    pub fn start_instance(&self, definition_id: &str) -> Result<WorkflowInstance, EngineError> {
        let definition = self
            .definitions
            .get(definition_id)
            .ok_or_else(|| EngineError::DefinitionNotFound(definition_id.to_string()))?;

        let instance = executor::instantiate(&definition, Utc::now())?;
        self.instances.insert(instance.clone());

        tracing::info!(
            "🚀 Started instance {} of {} at state {}",
            instance.id,
            definition.id,
            instance.current_state_id
        );

        self.mark_dirty();
        Ok(instance)
    }

    /// Fire an action on an instance
    ///
    /// The instance stays locked from the definition lookup until the
    /// transition is applied, so concurrent calls on the same instance see
    /// either none or all of each other's effects.
    pub async fn execute_action(
        &self,
        instance_id: &str,
        action_id: &str,
    ) -> Result<WorkflowInstance, EngineError> {
        let handle = self
            .instances
            .handle(instance_id)
            .ok_or_else(|| EngineError::InstanceNotFound(instance_id.to_string()))?;

        let mut instance = handle.lock().await;

        let definition = self
            .definitions
            .get(&instance.definition_id)
            .ok_or_else(|| EngineError::DefinitionNotFound(instance.definition_id.clone()))?;

        let entry = executor::fire(&definition, &mut instance, action_id, Utc::now())
            .map_err(|e| {
                tracing::warn!(
                    "Rejected action {} on instance {}: {}",
                    action_id,
                    instance_id,
                    e
                );
                e
            })?;

        tracing::info!(
            "⚡ Instance {}: {} ({} -> {})",
            instance_id,
            entry.action_id,
            entry.from_state_id,
            entry.to_state_id
        );

        let updated = instance.clone();
        drop(instance);

        self.mark_dirty();
        Ok(updated)
    }

    pub async fn instance(&self, instance_id: &str) -> Option<WorkflowInstance> {
        self.instances.get(instance_id).await
    }

    pub async fn instances(&self) -> Vec<WorkflowInstance> {
        self.instances.list().await
    }

    /// Instances of one definition, `None` if the definition does not exist
    pub async fn instances_of(&self, definition_id: &str) -> Option<Vec<WorkflowInstance>> {
        self.definitions.get(definition_id)?;

        let instances = self
            .instances
            .list()
            .await
            .into_iter()
            .filter(|instance| instance.definition_id == definition_id)
            .collect();

        Some(instances)
    }

    /// Actions that would currently succeed on an instance
    pub async fn available_actions(
        &self,
        instance_id: &str,
    ) -> Result<Vec<Action>, EngineError> {
        let instance = self
            .instances
            .get(instance_id)
            .await
            .ok_or_else(|| EngineError::InstanceNotFound(instance_id.to_string()))?;

        let definition = self
            .definitions
            .get(&instance.definition_id)
            .ok_or_else(|| EngineError::DefinitionNotFound(instance.definition_id.clone()))?;

        Ok(executor::available_actions(&definition, &instance)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Point-in-time copy of everything the engine serves
    pub async fn snapshot(&self) -> SnapshotDocument {
        take_snapshot(&self.definitions, &self.instances).await
    }

    /// Write a snapshot immediately, bypassing the background writer
    pub async fn flush(&self) -> Result<()> {
        match &self.persistence {
            Some(persistence) => persistence.write(&self.definitions, &self.instances).await,
            None => Ok(()),
        }
    }

    fn mark_dirty(&self) {
        if let Some(persistence) = &self.persistence {
            persistence.dirty.notify_one();
        }
    }
}

async fn take_snapshot(
    definitions: &DefinitionRegistry,
    instances: &InstanceStore,
) -> SnapshotDocument {
    SnapshotDocument {
        definitions: definitions
            .list()
            .iter()
            .map(|definition| WorkflowDefinition::clone(definition))
            .collect(),
        instances: instances.list().await,
    }
}

/// Snapshot and write under `write_lock`, appending the retained definitions
async fn write_snapshot(
    storage: &SnapshotStorage,
    write_lock: &Mutex<()>,
    retained: &[WorkflowDefinition],
    definitions: &DefinitionRegistry,
    instances: &InstanceStore,
) -> Result<()> {
    let _guard = write_lock.lock().await;
    let mut document = take_snapshot(definitions, instances).await;
    document.definitions.extend_from_slice(retained);
    storage.save(&document).await
}
