//! Key-value storage persisted as a single JSON object on disk.
//!
//! Every write rewrites the whole file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::repository::errors::{RepositoryError, RepositoryResult};

#[derive(Debug)]
pub struct LocalStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl LocalStorage {
    pub fn open(path: impl Into<PathBuf>) -> RepositoryResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and deserialises the value stored under `key`.
    pub fn get_item<T: DeserializeOwned>(&self, key: &str) -> RepositoryResult<Option<T>> {
        let _guard = self.guard()?;
        match self.read()?.remove(key) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub fn set_item<T: Serialize>(&self, key: &str, value: &T) -> RepositoryResult<()> {
        let _guard = self.guard()?;
        let mut items = self.read()?;
        items.insert(key.to_string(), serde_json::to_value(value)?);
        self.write(&items)
    }

    pub fn remove_item(&self, key: &str) -> RepositoryResult<()> {
        let _guard = self.guard()?;
        let mut items = self.read()?;
        if items.remove(key).is_some() {
            self.write(&items)?;
        }
        Ok(())
    }

    fn guard(&self) -> RepositoryResult<MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| RepositoryError::Unavailable("local storage lock poisoned".to_string()))
    }

    fn read(&self) -> RepositoryResult<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn write(&self, items: &Map<String, Value>) -> RepositoryResult<()> {
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(items)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_and_removes_items() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::open(dir.path().join("local.json")).unwrap();

        assert_eq!(storage.get_item::<Vec<i32>>("numbers").unwrap(), None);
        storage.set_item("numbers", &vec![1, 2, 3]).unwrap();
        assert_eq!(
            storage.get_item::<Vec<i32>>("numbers").unwrap(),
            Some(vec![1, 2, 3])
        );

        storage.remove_item("numbers").unwrap();
        assert_eq!(storage.get_item::<Vec<i32>>("numbers").unwrap(), None);
    }
}
