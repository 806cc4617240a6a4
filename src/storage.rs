//! Key/value storage for session state.
//!
//! Values are opaque JSON strings. Reads through [`load_json`] are
//! best-effort: a malformed value is logged and treated as absent.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use rustc_hash::FxHashMap;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::warn;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// IO error reading or writing the backing file
    #[error("Failed to access storage file: {0}")]
    Io(#[from] io::Error),

    /// JSON encoding or decoding error
    #[error("Failed to encode storage value: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key/value store.
pub trait KeyValueStore {
    /// Read a raw value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a raw value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backing store cannot be written.
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;

    /// Delete a value. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backing store cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Store held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: FxHashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value);

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);

        Ok(())
    }
}

/// Store backed by a single JSON object file.
///
/// The file is read on every access and rewritten on every change. A missing
/// file is an empty store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Use the file at `path`, which need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(source) => Err(source.into()),
        }
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
        fs::write(&self.path, serde_json::to_string_pretty(values)?)?;

        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        let mut values = self.read_all()?;

        values.insert(key.to_string(), value);

        self.write_all(&values)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let mut values = self.read_all()?;

        if values.remove(key).is_some() {
            self.write_all(&values)?;
        }

        Ok(())
    }
}

/// Read and decode a JSON value.
///
/// Missing keys, unreadable stores and malformed values all yield `None`;
/// the latter two are logged.
pub fn load_json<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(raw) => raw?,
        Err(source) => {
            warn!(key, %source, "failed to read stored value");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(source) => {
            warn!(key, %source, "ignoring malformed stored value");
            None
        }
    }
}

/// Encode and store a JSON value.
///
/// # Errors
///
/// Returns a [`StorageError`] if encoding or writing fails.
pub fn save_json<T: Serialize>(
    store: &mut impl KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    store.set(key, serde_json::to_string(value)?)
}
