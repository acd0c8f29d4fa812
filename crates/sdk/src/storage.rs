//! Persistent key/value storage for session data.
//!
//! Values are opaque strings keyed by name, the way browser `localStorage`
//! and React Native `AsyncStorage` hold them.

use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
};

use parking_lot::Mutex;

use crate::error::StorageError;

/// Directory created under the system data directory
pub const DATA_DIR_NAME: &str = "greentick";

/// File name of the [`FileStore`] table
pub const STORAGE_FILE_NAME: &str = "storage.toml";

/// String key/value store backing the session
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// TOML table on disk, rewritten on every change
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store at `<dir>/storage.toml`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(STORAGE_FILE_NAME))
    }

    /// Store in the system data directory, e.g. `~/.local/share/greentick/storage.toml`
    pub fn in_system_data_dir() -> Result<Self, StorageError> {
        let data_dir = dirs::data_dir().ok_or(StorageError::NoDataDir)?;
        Ok(Self::in_dir(data_dir.join(DATA_DIR_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| StorageError::Io(self.path.clone(), e))?;
        toml::from_str(&content).map_err(|e| StorageError::Parse(self.path.clone(), e))
    }

    fn write_table(&self, table: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if table.is_empty() {
            if self.path.exists() {
                std::fs::remove_file(&self.path)
                    .map_err(|e| StorageError::Io(self.path.clone(), e))?;
            }
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Io(parent.to_path_buf(), e))?;
        }
        let content = toml::to_string(table)?;
        std::fs::write(&self.path, content).map_err(|e| StorageError::Io(self.path.clone(), e))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock();
        Ok(self.read_table()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut table = self.read_table()?;
        table.insert(key.to_string(), value.to_string());
        self.write_table(&table)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut table = self.read_table()?;
        if table.remove(key).is_some() {
            self.write_table(&table)?;
        }
        Ok(())
    }
}
