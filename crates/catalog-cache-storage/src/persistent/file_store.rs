//! Durable store backed by a single JSON file

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

use catalog_cache_core::{CacheError, DurableStore, Result};

/// Durable store persisted as one JSON object on disk
///
/// The file is read once on [`FileStore::open`] and rewritten after every
/// mutation (write to a sibling temp file, then rename), so its contents
/// survive a process restart. An unreadable file is treated as empty.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    data: Arc<RwLock<BTreeMap<String, String>>>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!(
                    target: "catalog_cache",
                    path = %path.display(),
                    error = %e,
                    "durable store file is corrupt, starting empty"
                );
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(CacheError::Storage(e.to_string())),
        };

        Ok(Self {
            path,
            data: Arc::new(RwLock::new(data)),
        })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, data: &BTreeMap<String, String>) -> Result<()> {
        let text =
            serde_json::to_string(data).map_err(|e| CacheError::Serialization(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| CacheError::Storage(e.to_string()))?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, text).map_err(|e| CacheError::Storage(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| CacheError::Storage(e.to_string()))
    }
}

impl DurableStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut data = self.data.write();
        let previous = data.insert(key.to_string(), value.to_string());
        if let Err(e) = self.flush(&data) {
            // keep memory and disk in agreement
            match previous {
                Some(old) => data.insert(key.to_string(), old),
                None => data.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let mut data = self.data.write();
        let Some(old) = data.remove(key) else {
            return Ok(false);
        };
        if let Err(e) = self.flush(&data) {
            data.insert(key.to_string(), old);
            return Err(e);
        }
        Ok(true)
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.data.read().keys().cloned().collect())
    }

    fn remove_prefixed(&self, prefix: &str) -> Result<u64> {
        let mut data = self.data.write();
        let matching: Vec<String> = data
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect();
        if matching.is_empty() {
            return Ok(0);
        }

        let removed: Vec<(String, String)> = matching
            .into_iter()
            .filter_map(|key| data.remove(&key).map(|value| (key, value)))
            .collect();
        if let Err(e) = self.flush(&data) {
            data.extend(removed);
            return Err(e);
        }
        Ok(removed.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = FileStore::open(&path).unwrap();
        store.set("catalog_cache:categories", r#"{"data":[],"timestamp":1}"#).unwrap();
        store.set("session", "abc").unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("catalog_cache:categories").unwrap().as_deref(),
            Some(r#"{"data":[],"timestamp":1}"#)
        );
        assert_eq!(reopened.keys().unwrap().len(), 2);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{{{ nope").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_remove_prefixed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = FileStore::open(&path).unwrap();
        store.set("catalog_cache:featured", "1").unwrap();
        store.set("catalog_cache:products:all", "2").unwrap();
        store.set("cart", "3").unwrap();

        assert_eq!(store.remove_prefixed("catalog_cache:").unwrap(), 2);
        assert_eq!(store.remove_prefixed("catalog_cache:").unwrap(), 0);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.keys().unwrap(), vec!["cart".to_string()]);
    }

    #[test]
    fn test_failed_flush_keeps_removed_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");

        let store = FileStore::open(&path).unwrap();
        store.set("catalog_cache:featured", "1").unwrap();
        store.set("cart", "2").unwrap();

        // a directory where the temp file goes makes every flush fail
        fs::create_dir(path.with_extension("tmp")).unwrap();

        assert!(store.remove_prefixed("catalog_cache:").is_err());
        assert!(store.remove("cart").is_err());
        assert_eq!(
            store.keys().unwrap(),
            vec!["cart".to_string(), "catalog_cache:featured".to_string()]
        );
        assert_eq!(store.get("catalog_cache:featured").unwrap().as_deref(), Some("1"));

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.keys().unwrap().len(), 2);
    }

    #[test]
    fn test_remove_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("store.json")).unwrap();
        assert!(!store.remove("nothing").unwrap());
    }
}
