//! Persistent key/value storage standing in for browser local storage.

use crate::{ReportError, ReportResult};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// String key/value storage.
pub trait LocalStorage {
    fn get_item(&self, key: &str) -> ReportResult<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> ReportResult<()>;
    fn remove_item(&mut self, key: &str) -> ReportResult<()>;
}

/// In-memory storage, mostly for tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> ReportResult<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> ReportResult<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> ReportResult<()> {
        self.items.remove(key);
        Ok(())
    }
}

/// Storage backed by a single JSON object on disk.
///
/// The file is read on every access and rewritten on every change, so two processes sharing a
/// data directory see each other's writes.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> ReportResult<BTreeMap<String, String>> {
        if !self.path.is_file() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path).map_err(ReportError::StorageRead)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents).map_err(ReportError::Deserialization)
    }

    fn store(&self, items: &BTreeMap<String, String>) -> ReportResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(ReportError::StorageDirCreation)?;
        }
        let json = serde_json::to_string_pretty(items).map_err(ReportError::Serialization)?;
        fs::write(&self.path, json).map_err(ReportError::StorageWrite)
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> ReportResult<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> ReportResult<()> {
        let mut items = self.load()?;
        items.insert(key.to_string(), value.to_string());
        self.store(&items)
    }

    fn remove_item(&mut self, key: &str) -> ReportResult<()> {
        let mut items = self.load()?;
        if items.remove(key).is_some() {
            self.store(&items)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_round_trip_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("local_storage.json");
        let mut storage = FileStorage::new(&path);

        assert_eq!(storage.get_item("token").unwrap(), None);
        storage.set_item("token", "tok123").unwrap();
        assert!(path.is_file());

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get_item("token").unwrap().as_deref(), Some("tok123"));
    }

    #[test]
    fn test_file_storage_keeps_other_keys() {
        let tmp = TempDir::new().unwrap();
        let mut storage = FileStorage::new(tmp.path().join("ls.json"));
        storage.set_item("theme", "dark").unwrap();
        storage.set_item("token", "abc").unwrap();
        storage.remove_item("token").unwrap();

        assert_eq!(storage.get_item("token").unwrap(), None);
        assert_eq!(storage.get_item("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_file_storage_reports_corrupt_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ls.json");
        std::fs::write(&path, "not json").unwrap();
        let storage = FileStorage::new(&path);
        assert!(matches!(
            storage.get_item("token"),
            Err(ReportError::Deserialization(_))
        ));
    }

    #[test]
    fn test_memory_storage_overwrites() {
        let mut storage = MemoryStorage::new();
        storage.set_item("token", "one").unwrap();
        storage.set_item("token", "two").unwrap();
        assert_eq!(storage.get_item("token").unwrap().as_deref(), Some("two"));
    }
}
