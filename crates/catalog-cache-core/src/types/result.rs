//! Cache result types

use super::entry::CacheEntry;

/// Result of looking a key up in a single tier
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    /// Entry inside its TTL
    Hit(CacheEntry<T>),
    /// Past TTL but inside the stale window
    Stale(CacheEntry<T>),
    /// Absent, expired or unreadable
    Miss,
}

impl<T> CacheResult<T> {
    /// Check if this is a fresh hit
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheResult::Hit(_))
    }

    /// Check if this is a miss
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheResult::Miss)
    }

    /// Check if stale (needs revalidation)
    pub fn is_stale(&self) -> bool {
        matches!(self, CacheResult::Stale(_))
    }

    /// Extract the full entry, consuming the result
    pub fn entry(self) -> Option<CacheEntry<T>> {
        match self {
            CacheResult::Hit(entry) | CacheResult::Stale(entry) => Some(entry),
            CacheResult::Miss => None,
        }
    }
}

/// What a read-through call hands back to its caller
#[derive(Debug, Clone, PartialEq)]
pub struct CacheRead<T> {
    /// The value, possibly empty on failure
    pub value: T,
    /// Whether the value came from a cache tier rather than the network
    pub from_cache: bool,
}

impl<T> CacheRead<T> {
    /// Value served from a cache tier
    pub fn cached(value: T) -> Self {
        Self {
            value,
            from_cache: true,
        }
    }

    /// Value fetched from the remote source (or the empty fallback)
    pub fn fetched(value: T) -> Self {
        Self {
            value,
            from_cache: false,
        }
    }
}

impl<T: Default> CacheRead<T> {
    /// Empty, non-cached result used for every failure path
    pub fn empty() -> Self {
        Self::fetched(T::default())
    }
}
