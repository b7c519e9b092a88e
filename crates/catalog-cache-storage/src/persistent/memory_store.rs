//! In-process durable store

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use catalog_cache_core::{CacheError, DurableStore, Result};

/// Durable store kept in process memory
///
/// Useful for tests and for hosts without a writable disk. An optional byte
/// quota (keys plus values) mimics browser storage limits: a write that would
/// exceed it fails with [`CacheError::QuotaExceeded`] and leaves the store
/// untouched. Cloning creates a new handle to the SAME underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<HashMap<String, String>>>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Create an unbounded store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that holds at most `bytes` of keys and values
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            data: Arc::default(),
            quota: Some(bytes),
        }
    }

    /// Bytes currently used by keys and values
    pub fn used_bytes(&self) -> usize {
        self.data
            .read()
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl DurableStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut data = self.data.write();
        if let Some(quota) = self.quota {
            let replaced = data.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
            let used: usize = data.iter().map(|(k, v)| k.len() + v.len()).sum();
            let available = quota.saturating_sub(used - replaced);
            let needed = key.len() + value.len();
            if needed > available {
                return Err(CacheError::QuotaExceeded { needed, available });
            }
        }
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.data.write().remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.data.read().keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_get_set() {
        let store = MemoryStore::new();
        store.set("theme", "dark").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn test_remove_prefixed_leaves_other_keys() {
        let store = MemoryStore::new();
        store.set("catalog_cache:featured", "[]").unwrap();
        store.set("catalog_cache:products:all", "[]").unwrap();
        store.set("session", "abc").unwrap();

        let removed = store.remove_prefixed("catalog_cache:").unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.keys().unwrap(), vec!["session".to_string()]);
    }

    #[test]
    fn test_quota_exceeded() {
        let store = MemoryStore::with_quota(10);
        store.set("a", "1234").unwrap();

        let err = store.set("b", "123456789").unwrap_err();
        assert!(matches!(err, CacheError::QuotaExceeded { .. }));
        assert_eq!(store.get("b").unwrap(), None);
        assert_eq!(store.used_bytes(), 5);
    }

    #[test]
    fn test_quota_counts_replacement() {
        let store = MemoryStore::with_quota(6);
        store.set("k", "12345").unwrap();
        // replacing the value frees its old bytes first
        store.set("k", "54321").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("54321"));
    }
}
