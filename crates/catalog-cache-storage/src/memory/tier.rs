//! In-memory tier using DashMap

use dashmap::DashMap;
use std::sync::Arc;

use catalog_cache_core::CacheEntry;

/// Process-lifetime cache tier
///
/// Uses `DashMap` so reads and writes from concurrent tasks never need an
/// outer lock. Entries are replaced wholesale, never mutated in place.
/// Cloning creates a new handle to the SAME underlying map.
#[derive(Debug)]
pub struct MemoryTier<V> {
    data: Arc<DashMap<String, CacheEntry<V>>>,
}

impl<V> Clone for MemoryTier<V> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
        }
    }
}

impl<V> Default for MemoryTier<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> MemoryTier<V> {
    /// Create an empty tier
    pub fn new() -> Self {
        Self {
            data: Arc::new(DashMap::new()),
        }
    }

    /// Store `entry` under `key`, superseding any previous entry
    pub fn insert(&self, key: &str, entry: CacheEntry<V>) {
        self.data.insert(key.to_string(), entry);
    }

    /// Remove `key`, returning `true` if it existed
    pub fn remove(&self, key: &str) -> bool {
        self.data.remove(key).is_some()
    }

    /// Check if a key exists, regardless of freshness
    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Drop every entry, returning how many were held
    pub fn clear(&self) -> usize {
        let count = self.data.len();
        self.data.clear();
        count
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<V: Clone> MemoryTier<V> {
    /// Get a copy of the entry under `key`
    ///
    /// Freshness is the caller's concern; expired entries are returned too.
    pub fn get(&self, key: &str) -> Option<CacheEntry<V>> {
        self.data.get(key).map(|entry| entry.value().clone())
    }
}
