//! Key-value persistence for session-scoped values.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use crate::error::Result;

/// Persistence capability for the session identifiers.
///
/// Mirrors what a browser tab's session storage offers: string keys, string
/// values, living as long as the session does.
pub trait SessionStorage: Send + Sync {
    /// Read a stored value.
    fn get(&self, key: &str) -> Option<String>;

    /// Store a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Storage that lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage backed by a JSON object on disk, so a console session can be resumed.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    /// Use the file at `path`. It is created on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> HashMap<String, String> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Session file is not valid JSON, starting fresh"
                );
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        }
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock().unwrap();
        self.read_all().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap();
        let mut values = self.read_all();
        values.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&values)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert!(storage.get("conversationId").is_none());

        storage.set("conversationId", "abc").unwrap();
        assert_eq!(storage.get("conversationId").as_deref(), Some("abc"));
    }

    #[test]
    fn test_file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let storage = FileStorage::new(&path);
        storage.set("userId", "u-1").unwrap();
        storage.set("conversationId", "c-1").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get("userId").as_deref(), Some("u-1"));
        assert_eq!(reopened.get("conversationId").as_deref(), Some("c-1"));
    }

    #[test]
    fn test_file_storage_tolerates_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let storage = FileStorage::new(&path);
        assert!(storage.get("userId").is_none());
        storage.set("userId", "u-2").unwrap();
        assert_eq!(storage.get("userId").as_deref(), Some("u-2"));
    }
}
