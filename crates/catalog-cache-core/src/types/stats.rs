//! Cache statistics

/// Statistics for cache operations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Fresh hits served from the memory tier
    pub memory_hits: u64,
    /// Hits served from the persistent tier (fresh or stale)
    pub persistent_hits: u64,
    /// Subset of `persistent_hits` that were past their TTL
    pub stale_hits: u64,
    /// Reads that had to wait on the remote source
    pub misses: u64,
    /// Remote fetches issued (blocking and background)
    pub fetches: u64,
    /// Remote fetches that failed
    pub fetch_failures: u64,
    /// Background refreshes spawned
    pub refreshes: u64,
    /// Durable store writes that failed
    pub persist_failures: u64,
    /// Number of global invalidations
    pub invalidations: u64,
    /// Current number of memory tier entries
    pub size: usize,
}

impl CacheStats {
    /// Hits from any tier
    pub fn hits(&self) -> u64 {
        self.memory_hits + self.persistent_hits
    }

    /// Calculate hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            0.0
        } else {
            self.hits() as f64 / total as f64
        }
    }

    /// Total requests (hits + misses)
    pub fn total_requests(&self) -> u64 {
        self.hits() + self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stats() {
        let stats = CacheStats::default();
        assert_eq!(stats.hits(), 0);
        assert_eq!(stats.hit_ratio(), 0.0);
    }

    #[test]
    fn test_hit_ratio() {
        let stats = CacheStats {
            memory_hits: 60,
            persistent_hits: 20,
            misses: 20,
            ..Default::default()
        };
        assert!((stats.hit_ratio() - 0.8).abs() < f64::EPSILON);
        assert_eq!(stats.total_requests(), 100);
    }
}
