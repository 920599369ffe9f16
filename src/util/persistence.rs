//! Durable key/value storage for client-side state.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session store persists through the [`KeyValueStorage`] seam, which
//! mirrors the browser `Storage` surface (`getItem`/`setItem`/`removeItem`).
//! `FileStorage` backs it with one JSON file per key for the CLI host;
//! `MemoryStorage` keeps everything in-process.
//!
//! ERROR HANDLING
//! ==============
//! `load_json` and `save_json` never fail outward. A missing, unreadable, or
//! unparseable record reads as `None`; a failed write is logged and dropped.

#[cfg(test)]
#[path = "persistence_test.rs"]
mod persistence_test;

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Errors produced by storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io failed for {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

/// String-keyed, string-valued durable storage.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

// =============================================================================
// FILE STORAGE
// =============================================================================

/// One `<key>.json` file per key under a state directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Storage rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }
}

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Unique sibling temp file, so concurrent writers (threads or processes)
/// never share one.
fn temp_path_for(path: &std::path::Path) -> PathBuf {
    let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.with_extension(format!("json.{}.{n}.tmp", std::process::id()))
}

/// Map a storage key to a safe file stem.
pub(crate) fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io { path: self.dir.clone(), source })?;

        // Write-then-rename so readers never observe a torn record.
        let path = self.path_for(key);
        let tmp = temp_path_for(&path);
        std::fs::write(&tmp, value).map_err(|source| StorageError::Io { path: tmp.clone(), source })?;
        std::fs::rename(&tmp, &path).map_err(|source| StorageError::Io { path, source })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }
}

// =============================================================================
// MEMORY STORAGE
// =============================================================================

/// Process-local storage; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        items.remove(key);
        Ok(())
    }
}

// =============================================================================
// JSON HELPERS
// =============================================================================

/// Load a JSON value stored under `key`.
pub fn load_json<T: DeserializeOwned>(storage: &dyn KeyValueStorage, key: &str) -> Option<T> {
    let raw = match storage.get_item(key) {
        Ok(raw) => raw?,
        Err(e) => {
            tracing::warn!(%key, error = %e, "stored value unreadable; ignoring");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(%key, error = %e, "stored value malformed; ignoring");
            None
        }
    }
}

/// Save `value` as JSON under `key`. Failures are logged, not returned.
pub fn save_json<T: Serialize>(storage: &dyn KeyValueStorage, key: &str, value: &T) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(%key, error = %e, "failed to encode value for storage");
            return;
        }
    };
    if let Err(e) = storage.set_item(key, &raw) {
        tracing::warn!(%key, error = %e, "failed to persist value");
    }
}

/// Remove `key`. Failures are logged, not returned.
pub fn remove(storage: &dyn KeyValueStorage, key: &str) {
    if let Err(e) = storage.remove_item(key) {
        tracing::warn!(%key, error = %e, "failed to remove stored value");
    }
}
