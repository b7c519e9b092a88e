//! Cache entry type

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A cached value stamped with the wall-clock time it was written
///
/// Entries are never updated in place. A refresh builds a new entry and
/// replaces the old one under the same key, so a reader holding the old
/// entry always sees a consistent `(data, timestamp)` pair.
///
/// Serialized as `{"data": ..., "timestamp": <ms since epoch>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// The cached value
    pub data: T,
    /// Milliseconds since the Unix epoch at write time
    pub timestamp: u64,
}

impl<T> CacheEntry<T> {
    /// Create a new entry written at `timestamp`
    pub fn new(data: T, timestamp: u64) -> Self {
        Self { data, timestamp }
    }

    /// Age of the entry relative to `now_ms`
    ///
    /// Timestamps in the future (clock skew) count as age zero.
    pub fn age(&self, now_ms: u64) -> Duration {
        Duration::from_millis(now_ms.saturating_sub(self.timestamp))
    }

    /// Consume the entry, returning the cached value
    pub fn into_data(self) -> T {
        self.data
    }
}
