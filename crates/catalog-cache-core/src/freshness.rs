//! Freshness policy shared by every tier
//!
//! The same policy judges memory and persistent entries, so a hit is
//! classified identically no matter where it came from.

use std::time::Duration;

use crate::{CacheEntry, CacheResult};

/// Default time-to-live for cached catalog data
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Default window after TTL during which a persisted entry may still be
/// served while it is refreshed
pub const DEFAULT_STALE_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

/// How usable an entry is at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Inside the TTL
    Fresh,
    /// Past the TTL but inside the stale window
    Stale,
    /// Too old to serve, or absent
    Expired,
}

/// Fixed-TTL freshness policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessPolicy {
    ttl: Duration,
    stale_window: Duration,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_STALE_WINDOW)
    }
}

impl FreshnessPolicy {
    /// Create a policy with the given TTL and stale window
    pub fn new(ttl: Duration, stale_window: Duration) -> Self {
        Self { ttl, stale_window }
    }

    /// The configured TTL
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The configured stale window
    pub fn stale_window(&self) -> Duration {
        self.stale_window
    }

    /// An entry is valid iff `now - timestamp < ttl`. A missing entry never is.
    pub fn is_valid<T>(&self, entry: Option<&CacheEntry<T>>, now_ms: u64) -> bool {
        self.classify(entry, now_ms) == Freshness::Fresh
    }

    /// Classify an entry at `now_ms`
    pub fn classify<T>(&self, entry: Option<&CacheEntry<T>>, now_ms: u64) -> Freshness {
        let Some(entry) = entry else {
            return Freshness::Expired;
        };
        let age = entry.age(now_ms);
        if age < self.ttl {
            Freshness::Fresh
        } else if age < self.ttl.saturating_add(self.stale_window) {
            Freshness::Stale
        } else {
            Freshness::Expired
        }
    }

    /// Judge an entry read from a tier
    pub fn lookup<T>(&self, entry: Option<CacheEntry<T>>, now_ms: u64) -> CacheResult<T> {
        match (self.classify(entry.as_ref(), now_ms), entry) {
            (Freshness::Fresh, Some(entry)) => CacheResult::Hit(entry),
            (Freshness::Stale, Some(entry)) => CacheResult::Stale(entry),
            _ => CacheResult::Miss,
        }
    }
}
