//! Key/value storage backing the theme and preferences (the page's local storage).

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// File name of the storage file inside the data directory.
pub const STORAGE_FILE: &str = "storage.json";

/// Error reading or writing storage.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("Storage file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key/value store. Last writer wins.
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Storage kept in one JSON object file (`{"key": "value", ...}`).
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage file inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(STORAGE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all items. A missing file is an empty store (first run); so is a
    /// corrupt one, which the next write replaces.
    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(d) => d,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&data) {
            Ok(items) => Ok(items),
            Err(e) => {
                log::error!(
                    "Ignoring corrupt storage file {}: {}",
                    self.path.display(),
                    e
                );
                Ok(BTreeMap::new())
            }
        }
    }

    /// Write all items atomically (temp file, then rename).
    fn save(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(items)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(tmp, &self.path)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.load()?;
        items.insert(key.to_string(), value.to_string());
        self.save(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.load()?;
        if items.remove(key).is_some() {
            self.save(&items)?;
        }
        Ok(())
    }
}

/// In-memory storage. Clones share the same items.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_missing_file_is_empty() {
        let tmp = tempfile::TempDir::new().unwrap();
        let storage = FileStorage::in_dir(tmp.path());
        assert_eq!(storage.get_item("theme").unwrap(), None);
    }

    #[test]
    fn file_storage_round_trip_and_remove() {
        let tmp = tempfile::TempDir::new().unwrap();
        let storage = FileStorage::in_dir(&tmp.path().join("nested"));
        storage.set_item("theme", "dark").unwrap();
        storage.set_item("other", "1").unwrap();
        assert_eq!(storage.get_item("theme").unwrap().as_deref(), Some("dark"));

        let reopened = FileStorage::new(storage.path());
        assert_eq!(reopened.get_item("other").unwrap().as_deref(), Some("1"));

        reopened.remove_item("theme").unwrap();
        assert_eq!(storage.get_item("theme").unwrap(), None);
        assert!(!storage.path().with_extension("tmp").exists());
    }

    #[test]
    fn file_storage_corrupt_file_reads_empty_and_is_rewritten() {
        let tmp = tempfile::TempDir::new().unwrap();
        let storage = FileStorage::in_dir(tmp.path());
        fs::write(storage.path(), "{corrupt").unwrap();
        assert_eq!(storage.get_item("theme").unwrap(), None);
        storage.remove_item("theme").unwrap();

        storage.set_item("theme", "dark").unwrap();
        assert_eq!(storage.get_item("theme").unwrap().as_deref(), Some("dark"));
        let written = fs::read_to_string(storage.path()).unwrap();
        assert!(serde_json::from_str::<BTreeMap<String, String>>(&written).is_ok());
    }

    #[test]
    fn memory_storage_clones_share_items() {
        let a = MemoryStorage::new();
        let b = a.clone();
        a.set_item("k", "v").unwrap();
        assert_eq!(b.get_item("k").unwrap().as_deref(), Some("v"));
        b.remove_item("k").unwrap();
        assert_eq!(a.get_item("k").unwrap(), None);
    }
}
