//! Durable key-value snapshots of the task collection
//!
//! Each key maps to one file holding the whole collection. Absence of a file
//! means "no prior snapshot", which callers treat as a fresh start.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ensure_state_dir, load_toml, save_toml};
use crate::board::Task;
use crate::error::{AppError, Result};

const SNAPSHOT_VERSION: u32 = 1;

/// Persistence substrate the task store snapshots into
pub trait SnapshotStore: Send {
    /// `Ok(None)` when nothing was ever saved under `key`
    fn load(&self, key: &str) -> Result<Option<Vec<Task>>>;

    /// Replace the snapshot under `key` with `tasks`
    fn save(&self, key: &str, tasks: &[Task]) -> Result<()>;
}

/// Snapshot file layout
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotFile {
    version: u32,
    saved_at: DateTime<Utc>,
    #[serde(default)]
    tasks: Vec<Task>,
}

/// One TOML file per key under `{root}/state/`
pub struct FileSnapshotStore {
    root: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn snapshot_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(AppError::config(format!("invalid store name '{}'", key)));
        }
        Ok(ensure_state_dir(&self.root)?.join(format!("{}.toml", key)))
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self, key: &str) -> Result<Option<Vec<Task>>> {
        let path = self.snapshot_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let file: SnapshotFile = load_toml(&path)?;
        if file.version != SNAPSHOT_VERSION {
            return Err(AppError::storage(format!(
                "unsupported snapshot version {} in {}",
                file.version,
                path.display()
            )));
        }
        Ok(Some(file.tasks))
    }

    fn save(&self, key: &str, tasks: &[Task]) -> Result<()> {
        let path = self.snapshot_path(key)?;
        let file = SnapshotFile {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            tasks: tasks.to_vec(),
        };
        save_toml(&path, &file)?;
        Ok(())
    }
}

/// Process-local snapshots; clones share the same map
#[derive(Clone, Default)]
pub struct MemorySnapshotStore {
    slots: Arc<Mutex<HashMap<String, Vec<Task>>>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self, key: &str) -> Result<Option<Vec<Task>>> {
        let slots = self
            .slots
            .lock()
            .map_err(|_| AppError::storage("snapshot lock poisoned"))?;
        Ok(slots.get(key).cloned())
    }

    fn save(&self, key: &str, tasks: &[Task]) -> Result<()> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| AppError::storage("snapshot lock poisoned"))?;
        slots.insert(key.to_string(), tasks.to_vec());
        Ok(())
    }
}
