/// JSON snapshot persistence for definitions and instances
///
/// The whole data set is one document with two lists, `definitions` and
/// `instances`, rewritten in full after every successful mutation. Writes go to
/// a temporary sibling file first and are renamed into place, so a crash mid
/// write never leaves a truncated snapshot behind.

use crate::runtime::instance::WorkflowInstance;
use crate::workflow::types::WorkflowDefinition;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// On-disk representation of the full data set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDocument {
    #[serde(default)]
    pub definitions: Vec<WorkflowDefinition>,
    #[serde(default)]
    pub instances: Vec<WorkflowInstance>,
}

/// File-backed snapshot storage
#[derive(Debug, Clone)]
pub struct SnapshotStorage {
    path: PathBuf,
}

impl SnapshotStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot, `Ok(None)` when the file does not exist yet
    pub async fn load(&self) -> Result<Option<SnapshotDocument>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read snapshot {}", self.path.display())
                })
            }
        };

        let document = serde_json::from_slice(&raw)
            .with_context(|| format!("Malformed snapshot {}", self.path.display()))?;

        Ok(Some(document))
    }

    /// Replace the snapshot file with `document`
    pub async fn save(&self, document: &SnapshotDocument) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create data directory {}", parent.display()))?;
        }

        let json = serde_json::to_vec_pretty(document)?;
        let tmp_path = self.path.with_extension("json.tmp");

        tokio::fs::write(&tmp_path, json)
            .await
            .with_context(|| format!("Failed to write snapshot {}", tmp_path.display()))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .with_context(|| {
                format!("Failed to move snapshot into place at {}", self.path.display())
            })?;

        tracing::debug!(
            "💾 Snapshot written: {} definitions, {} instances -> {}",
            document.definitions.len(),
            document.instances.len(),
            self.path.display()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::types::State;
    use chrono::Utc;

    fn sample_document() -> SnapshotDocument {
        let definition = WorkflowDefinition {
            id: "wf-1".to_string(),
            name: "Single".to_string(),
            states: vec![State {
                id: "only".to_string(),
                name: "Only".to_string(),
                is_initial: true,
                is_final: true,
                enabled: true,
                description: Some("the only state".to_string()),
            }],
            actions: Vec::new(),
        };
        let instance = WorkflowInstance::start(&definition.id, "only", Utc::now());

        SnapshotDocument {
            definitions: vec![definition],
            instances: vec![instance],
        }
    }

    #[tokio::test]
    async fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SnapshotStorage::new(dir.path().join("absent.json"));

        assert!(storage.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_load_reproduces_document() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SnapshotStorage::new(dir.path().join("nested").join("workflows.json"));
        let document = sample_document();

        storage.save(&document).await.unwrap();

        assert_eq!(storage.load().await.unwrap(), Some(document));
    }

    #[tokio::test]
    async fn document_uses_named_camel_case_lists() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SnapshotStorage::new(dir.path().join("workflows.json"));
        storage.save(&sample_document()).await.unwrap();

        let raw = std::fs::read_to_string(storage.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert!(value["definitions"].is_array());
        assert_eq!(value["instances"][0]["currentStateId"], "only");
        assert_eq!(value["instances"][0]["history"][0]["fromStateId"], "");
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workflows.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(SnapshotStorage::new(path).load().await.is_err());
    }
}
