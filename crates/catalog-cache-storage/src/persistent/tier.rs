//! Persistent tier: JSON entries on top of a durable store

use serde::{Serialize, de::DeserializeOwned};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use catalog_cache_core::{CacheEntry, DurableStore, JsonSerializer, Serializer, namespace_prefix};

/// Failure-tolerant adapter over a [`DurableStore`]
///
/// Entries are stored as `{"data": ..., "timestamp": ...}` text. Nothing here
/// returns an error: unreadable or corrupt entries read as absent (and are
/// removed best-effort), failed writes are logged and reported as `false`.
/// The durable store is an optimization layer, never the source of truth.
#[derive(Clone)]
pub struct PersistentTier {
    store: Arc<dyn DurableStore>,
    serializer: JsonSerializer,
}

impl fmt::Debug for PersistentTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentTier")
            .field("serializer", &self.serializer.name())
            .finish_non_exhaustive()
    }
}

impl PersistentTier {
    /// Create a JSON tier over `store`
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self {
            store,
            serializer: JsonSerializer,
        }
    }

    /// Read and decode the entry under `key`
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<CacheEntry<T>> {
        let text = match self.store.get(key) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                warn!(target: "catalog_cache", key = %key, error = %e, "durable store read failed");
                return None;
            }
        };

        match self.serializer.deserialize::<CacheEntry<T>>(&text) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(target: "catalog_cache", key = %key, error = %e, "dropping corrupt persisted entry");
                if let Err(e) = self.store.remove(key) {
                    debug!(target: "catalog_cache", key = %key, error = %e, "could not remove corrupt entry");
                }
                None
            }
        }
    }

    /// Encode and store `entry` under `key`
    ///
    /// Returns `false` if the entry could not be persisted.
    pub fn write<T: Serialize>(&self, key: &str, entry: &CacheEntry<T>) -> bool {
        let result = self
            .serializer
            .serialize(entry)
            .and_then(|text| self.store.set(key, &text));

        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(target: "catalog_cache", key = %key, error = %e, "failed to persist cache entry");
                false
            }
        }
    }

    /// Remove every entry stored under `namespace`, leaving other keys alone
    ///
    /// Returns the number of entries removed.
    pub fn clear_namespace(&self, namespace: &str) -> u64 {
        match self.store.remove_prefixed(&namespace_prefix(namespace)) {
            Ok(count) => count,
            Err(e) => {
                warn!(target: "catalog_cache", namespace = %namespace, error = %e, "failed to clear persisted entries");
                0
            }
        }
    }

    /// Remove the entry under `key`; returns `false` if nothing was removed
    pub fn remove(&self, key: &str) -> bool {
        match self.store.remove(key) {
            Ok(removed) => removed,
            Err(e) => {
                warn!(target: "catalog_cache", key = %key, error = %e, "failed to remove persisted entry");
                false
            }
        }
    }
}
