// Dot-path configuration lookup over a nested JSON mapping loaded from disk.
// The file is read and parsed once, on first access, then cached for the
// life of the store.

use crate::errors::ConfigError;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Loads a nested JSON mapping from a file path and answers dot-path lookups
/// against it, e.g. `get("database.host")`.
///
/// The file is read and parsed once, on first access, then cached.
pub struct ConfigStore {
    path: Mutex<Option<PathBuf>>,
    config: Mutex<Option<Value>>,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore {
    pub fn new() -> Self {
        Self {
            path: Mutex::new(None),
            config: Mutex::new(None),
        }
    }

    /// Point the store at a config file. Clears any cached mapping so the
    /// next lookup re-reads from the new path.
    pub fn set_filepath(&self, path: impl Into<PathBuf>) {
        *self.path.lock().unwrap() = Some(path.into());
        *self.config.lock().unwrap() = None;
    }

    pub fn filepath(&self) -> Option<PathBuf> {
        self.path.lock().unwrap().clone()
    }

    fn load(&self, path: &Path) -> Result<Value, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    fn mapping(&self) -> Result<Value, ConfigError> {
        let mut cached = self.config.lock().unwrap();
        if let Some(ref value) = *cached {
            return Ok(value.clone());
        }
        let path = self
            .path
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ConfigError::KeyNotFound("<no config file set>".to_string()))?;
        let value = self.load(&path)?;
        *cached = Some(value.clone());
        Ok(value)
    }

    /// The whole cached mapping, loading it first if necessary. `Err` if no
    /// file has been set, or on I/O / parse failure.
    pub fn root(&self) -> Result<Value, ConfigError> {
        self.mapping()
    }

    /// Look up `key`, a dot-separated path into the nested mapping.
    ///
    /// Returns `Ok(None)` when any path segment is missing or explicitly
    /// `null`, and `Err` only for I/O or parse failures of the backing file.
    pub fn get(&self, key: &str) -> Result<Option<Value>, ConfigError> {
        let mut current = self.mapping()?;
        for segment in key.split('.') {
            match current.get(segment) {
                Some(Value::Null) | None => return Ok(None),
                Some(next) => current = next.clone(),
            }
        }
        Ok(Some(current))
    }
}
