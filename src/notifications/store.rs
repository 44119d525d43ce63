//! Storage for the last-notified timestamp.
//!
//! This is the guard's only state that survives a restart. It lets a freshly
//! started guard respect a de-dup window opened by the previous session.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persists a single millisecond timestamp.
pub trait TimestampStore: Send + Sync + std::fmt::Debug {
    fn load(&self) -> Result<Option<u64>, StoreError>;
    fn store(&self, millis: u64) -> Result<(), StoreError>;
}

/// Keeps the timestamp for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryTimestampStore {
    value: Mutex<Option<u64>>,
}

impl MemoryTimestampStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TimestampStore for MemoryTimestampStore {
    fn load(&self) -> Result<Option<u64>, StoreError> {
        Ok(*self.value.lock().expect("timestamp store mutex poisoned"))
    }

    fn store(&self, millis: u64) -> Result<(), StoreError> {
        *self.value.lock().expect("timestamp store mutex poisoned") = Some(millis);
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedState {
    last_notified_ms: u64,
}

/// Keeps the timestamp in a small JSON file.
#[derive(Debug, Clone)]
pub struct FileTimestampStore {
    path: PathBuf,
}

impl FileTimestampStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TimestampStore for FileTimestampStore {
    fn load(&self) -> Result<Option<u64>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let reader = BufReader::new(File::open(&self.path)?);
        let state: PersistedState = serde_json::from_reader(reader)?;
        Ok(Some(state.last_notified_ms))
    }

    fn store(&self, millis: u64) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer(writer, &PersistedState { last_notified_ms: millis })?;
        tracing::debug!(path = ?self.path, last_notified_ms = millis, "Persisted notification timestamp");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let store = MemoryTimestampStore::new();
        assert_eq!(store.load().unwrap(), None);
        store.store(42).unwrap();
        assert_eq!(store.load().unwrap(), Some(42));
    }

    #[test]
    fn test_file_store_persists() {
        let path = std::env::temp_dir().join(format!("guard-store-{}.json", uuid::Uuid::new_v4()));

        let store = FileTimestampStore::new(&path);
        assert_eq!(store.load().unwrap(), None);
        store.store(1_700_000_000_000).unwrap();

        // A new instance sees the previous session's value
        let reopened = FileTimestampStore::new(&path);
        assert_eq!(reopened.load().unwrap(), Some(1_700_000_000_000));

        std::fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let path = std::env::temp_dir().join(format!("guard-store-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, "not json").unwrap();

        let store = FileTimestampStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Json(_))));

        std::fs::remove_file(&path).unwrap_or_default();
    }
}
