//! Key-value snapshot storage.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};

/// Durable slots holding one JSON snapshot each.
pub trait Storage: Send + Sync {
    /// Read the slot, `None` if it was never written.
    fn load(&self, key: &str) -> StoreResult<Option<String>>;

    /// Overwrite the slot.
    fn save(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Delete the slot. Missing slots are not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// Shared storage handle.
pub type SharedStorage = Arc<dyn Storage>;

fn validate_key(key: &str) -> StoreResult<()> {
    let ok = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

/// Read and decode a snapshot.
///
/// Unreadable or undecodable snapshots are logged and treated as absent.
pub fn load_snapshot<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    let raw = match storage.load(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "Failed to read snapshot");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => {
            debug!(key, "Rehydrated snapshot");
            Some(value)
        }
        Err(e) => {
            warn!(key, error = %e, "Ignoring corrupt snapshot");
            None
        }
    }
}

/// Encode and write a snapshot.
pub fn save_snapshot<T: Serialize>(storage: &dyn Storage, key: &str, value: &T) -> StoreResult<()> {
    let json = serde_json::to_string(value)?;
    storage.save(key, &json)
}

/// One `<key>.json` file per slot under a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir`, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes to a temp file and renames it over the slot.
    fn save(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        let temp_path = path.with_extension("json.tmp");
        let mut file = fs::File::create(&temp_path)?;

        let cleanup_and_err = |e: std::io::Error| {
            let _ = fs::remove_file(&temp_path);
            e
        };

        file.write_all(value.as_bytes()).map_err(cleanup_and_err)?;
        file.sync_all().map_err(cleanup_and_err)?;
        fs::rename(&temp_path, &path).map_err(cleanup_and_err)?;

        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: DashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> StoreResult<Option<String>> {
        validate_key(key)?;
        Ok(self.slots.get(key).map(|v| v.clone()))
    }

    fn save(&self, key: &str, value: &str) -> StoreResult<()> {
        validate_key(key)?;
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        validate_key(key)?;
        self.slots.remove(key);
        Ok(())
    }
}
