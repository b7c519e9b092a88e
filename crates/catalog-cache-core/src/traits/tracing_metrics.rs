//! `tracing` sink for cache metrics

use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::{CacheMetrics, CacheOperation, CacheTier, EvictionReason};

/// Operations slower than this are logged at `WARN` by default
pub const DEFAULT_SLOW_OPERATION: Duration = Duration::from_secs(1);

/// Metrics sink that reports cache events as log lines
///
/// Hits and replacements go to `TRACE`, misses and stale hits to `DEBUG`,
/// invalidations to `INFO`. Any operation slower than the slow threshold is
/// raised to `WARN`. Every event carries the `service` field so several
/// caches can share one subscriber.
#[derive(Debug, Clone)]
pub struct TracingMetrics {
    service: String,
    slow_threshold: Duration,
}

impl Default for TracingMetrics {
    fn default() -> Self {
        Self {
            service: "catalog_cache".to_string(),
            slow_threshold: DEFAULT_SLOW_OPERATION,
        }
    }
}

impl TracingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Label events with `name` instead of `catalog_cache`
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service = name.into();
        self
    }

    /// Warn about operations that take longer than `threshold`
    pub fn with_slow_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold = threshold;
        self
    }
}

impl CacheMetrics for TracingMetrics {
    fn record_hit(&self, key: &str, tier: CacheTier) {
        trace!(target: "catalog_cache::metrics", service = %self.service, key = %key, tier = tier.as_str(), "cache hit");
    }

    fn record_miss(&self, key: &str) {
        debug!(target: "catalog_cache::metrics", service = %self.service, key = %key, "cache miss, going remote");
    }

    fn record_stale_hit(&self, key: &str) {
        debug!(target: "catalog_cache::metrics", service = %self.service, key = %key, "served stale entry");
    }

    fn record_latency(&self, operation: CacheOperation, duration: Duration) {
        let elapsed_ms = duration.as_millis() as u64;
        if duration >= self.slow_threshold {
            warn!(target: "catalog_cache::metrics", service = %self.service, operation = operation.as_str(), elapsed_ms, "slow cache operation");
        } else {
            trace!(target: "catalog_cache::metrics", service = %self.service, operation = operation.as_str(), elapsed_ms, "cache operation finished");
        }
    }

    fn record_eviction(&self, reason: EvictionReason, count: u64) {
        match reason {
            EvictionReason::Invalidated => {
                info!(target: "catalog_cache::metrics", service = %self.service, count, "cache entries invalidated")
            }
            EvictionReason::Replaced => {
                trace!(target: "catalog_cache::metrics", service = %self.service, count, "cache entry replaced")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::io;
    use std::sync::Arc;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture(level: tracing::Level, f: impl FnOnce()) -> String {
        let out = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(out.clone())
            .with_max_level(level)
            .with_ansi(false)
            .without_time()
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        out.text()
    }

    #[test]
    fn test_events_carry_service_and_levels() {
        let metrics = TracingMetrics::new().with_service_name("storefront");

        let logs = capture(tracing::Level::DEBUG, || {
            metrics.record_hit("catalog_cache:featured", CacheTier::Memory);
            metrics.record_miss("catalog_cache:categories");
            metrics.record_stale_hit("catalog_cache:products:all");
            metrics.record_eviction(EvictionReason::Invalidated, 3);
            metrics.record_eviction(EvictionReason::Replaced, 1);
        });

        // trace-level events are filtered out
        assert!(!logs.contains("cache hit"));
        assert!(!logs.contains("cache entry replaced"));

        assert!(logs.contains("cache miss, going remote"));
        assert!(logs.contains("served stale entry"));
        assert!(logs.contains("cache entries invalidated"));
        assert!(logs.contains("count=3"));
        assert!(logs.contains("service=storefront"));
        assert!(!logs.contains("service=catalog_cache"));
    }

    #[test]
    fn test_slow_operation_is_a_warning() {
        let metrics = TracingMetrics::new().with_slow_threshold(Duration::from_millis(100));

        let logs = capture(tracing::Level::WARN, || {
            metrics.record_latency(CacheOperation::Get, Duration::from_millis(2));
            metrics.record_latency(CacheOperation::Fetch, Duration::from_millis(1_500));
        });

        assert_eq!(logs.matches("slow cache operation").count(), 1);
        assert!(logs.contains("elapsed_ms=1500"));
        assert!(logs.contains("service=catalog_cache"));
        assert!(!logs.contains("cache operation finished"));
    }
}
