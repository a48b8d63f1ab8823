//! Persistent key-value storage.
//!
//! The dashboard persists snapshot history, daily P/L and a couple of
//! preference tokens as JSON strings under namespaced keys. The store is
//! deliberately tiny: string keys, string values, no transactions. Callers
//! on the history path absorb every error (a blocked store degrades to "no
//! history", never to a crash).

use std::fs;
use std::path::PathBuf;

use dashmap::DashMap;
use log::warn;

use crate::errors::StorageError;

/// String key-value store.
pub trait KvStore: Send + Sync {
    /// Read a value. `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store used by tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryKvStore {
    entries: DashMap<String, String>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// File-backed store: one JSON object per file, loaded eagerly and written
/// back whole on every mutation.
pub struct FileKvStore {
    path: PathBuf,
    entries: DashMap<String, String>,
}

impl FileKvStore {
    /// Open (or create) a store at the given path. A missing or corrupt
    /// file starts empty; the next write replaces it.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = DashMap::new();
        match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<std::collections::BTreeMap<String, String>>(&raw)
            {
                Ok(map) => {
                    for (key, value) in map {
                        entries.insert(key, value);
                    }
                }
                Err(err) => {
                    warn!("kv store {} is corrupt, starting empty: {}", path.display(), err);
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                warn!("kv store {} unreadable, starting empty: {}", path.display(), err);
            }
        }
        Self { path, entries }
    }

    fn flush(&self, key: &str) -> Result<(), StorageError> {
        let map: std::collections::BTreeMap<String, String> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        let raw = serde_json::to_string(&map).map_err(|err| StorageError::WriteFailed {
            key: key.to_string(),
            message: err.to_string(),
        })?;
        fs::write(&self.path, raw).map_err(|err| StorageError::WriteFailed {
            key: key.to_string(),
            message: err.to_string(),
        })
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush(key)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        self.flush(key)
    }
}
