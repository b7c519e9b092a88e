//! Cache configuration

use std::time::Duration;

use catalog_cache_core::{DEFAULT_STALE_WINDOW, DEFAULT_TTL, FreshnessPolicy};

/// Namespace every catalog key is stored under
pub const DEFAULT_NAMESPACE: &str = "catalog_cache";

/// Configuration for [`CatalogCache`](crate::CatalogCache)
#[derive(Debug, Clone)]
pub struct CatalogCacheConfig {
    /// How long an entry counts as fresh
    pub ttl: Duration,
    /// How long past `ttl` a persisted entry may still be served while it
    /// is refreshed in the background
    pub stale_window: Duration,
    /// Prefix for every durable-store key this cache owns
    pub namespace: String,
    /// Share one remote fetch between concurrent misses/refreshes of a key
    pub coalesce: bool,
}

impl Default for CatalogCacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            stale_window: DEFAULT_STALE_WINDOW,
            namespace: DEFAULT_NAMESPACE.to_string(),
            coalesce: true,
        }
    }
}

impl CatalogCacheConfig {
    /// Create config with specific TTL
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            ..Default::default()
        }
    }

    /// Create config with namespace
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    /// Set the stale window
    pub fn stale_window(mut self, window: Duration) -> Self {
        self.stale_window = window;
        self
    }

    /// Let every concurrent miss and stale read hit the network
    pub fn no_coalescing(mut self) -> Self {
        self.coalesce = false;
        self
    }

    /// Freshness policy derived from this config
    pub fn policy(&self) -> FreshnessPolicy {
        FreshnessPolicy::new(self.ttl, self.stale_window)
    }
}
