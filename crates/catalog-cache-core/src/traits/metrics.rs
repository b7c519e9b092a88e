//! Metrics trait for cache observability

use std::time::Duration;

/// Cache tier for metrics labeling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTier {
    /// Process-lifetime memory tier
    Memory,
    /// Durable tier that survives restarts
    Persistent,
}

impl CacheTier {
    /// Get tier as string label
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheTier::Memory => "memory",
            CacheTier::Persistent => "persistent",
        }
    }
}

/// Cache operation for latency tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheOperation {
    Get,
    Fetch,
    Refresh,
    Persist,
    Invalidate,
}

impl CacheOperation {
    /// Get operation as string label
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheOperation::Get => "get",
            CacheOperation::Fetch => "fetch",
            CacheOperation::Refresh => "refresh",
            CacheOperation::Persist => "persist",
            CacheOperation::Invalidate => "invalidate",
        }
    }
}

/// Reason an entry left the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvictionReason {
    /// Explicitly invalidated
    Invalidated,
    /// Replaced by a newer entry
    Replaced,
}

impl EvictionReason {
    /// Get reason as string label
    pub fn as_str(&self) -> &'static str {
        match self {
            EvictionReason::Invalidated => "invalidated",
            EvictionReason::Replaced => "replaced",
        }
    }
}

/// Trait for cache metrics/observability
///
/// Implement this to integrate with your metrics system (Prometheus, StatsD, etc.)
pub trait CacheMetrics: Send + Sync + 'static {
    /// Record a fresh or promoted hit
    fn record_hit(&self, key: &str, tier: CacheTier);

    /// Record a miss that went to the network
    fn record_miss(&self, key: &str);

    /// Record a stale hit (served stale while revalidating)
    fn record_stale_hit(&self, key: &str);

    /// Record operation latency
    fn record_latency(&self, operation: CacheOperation, duration: Duration);

    /// Record entries leaving the cache
    fn record_eviction(&self, reason: EvictionReason, count: u64);
}

/// No-op metrics implementation (default)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl CacheMetrics for NoopMetrics {
    #[inline]
    fn record_hit(&self, _key: &str, _tier: CacheTier) {}

    #[inline]
    fn record_miss(&self, _key: &str) {}

    #[inline]
    fn record_stale_hit(&self, _key: &str) {}

    #[inline]
    fn record_latency(&self, _operation: CacheOperation, _duration: Duration) {}

    #[inline]
    fn record_eviction(&self, _reason: EvictionReason, _count: u64) {}
}

/// Metrics adapter using the `metrics` crate
///
/// # Example
/// ```ignore
/// use catalog_cache_core::MetricsCrateAdapter;
///
/// let metrics = MetricsCrateAdapter::new("catalog_cache");
/// // Emits: catalog_cache_hits_total, catalog_cache_misses_total, etc.
/// ```
#[cfg(feature = "metrics")]
#[derive(Debug, Clone)]
pub struct MetricsCrateAdapter {
    prefix: String,
}

#[cfg(feature = "metrics")]
impl MetricsCrateAdapter {
    /// Create a new adapter with the given metric name prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn metric_name(&self, name: &str) -> String {
        format!("{}_{}", self.prefix, name)
    }
}

#[cfg(feature = "metrics")]
impl CacheMetrics for MetricsCrateAdapter {
    fn record_hit(&self, _key: &str, tier: CacheTier) {
        metrics::counter!(self.metric_name("hits_total"), "tier" => tier.as_str()).increment(1);
    }

    fn record_miss(&self, _key: &str) {
        metrics::counter!(self.metric_name("misses_total")).increment(1);
    }

    fn record_stale_hit(&self, _key: &str) {
        metrics::counter!(self.metric_name("stale_hits_total")).increment(1);
    }

    fn record_latency(&self, operation: CacheOperation, duration: Duration) {
        metrics::histogram!(
            self.metric_name("operation_duration_seconds"),
            "operation" => operation.as_str()
        )
        .record(duration.as_secs_f64());
    }

    fn record_eviction(&self, reason: EvictionReason, count: u64) {
        metrics::counter!(
            self.metric_name("evictions_total"),
            "reason" => reason.as_str()
        )
        .increment(count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_as_str() {
        assert_eq!(CacheTier::Memory.as_str(), "memory");
        assert_eq!(CacheTier::Persistent.as_str(), "persistent");
    }

    #[test]
    fn test_operation_as_str() {
        assert_eq!(CacheOperation::Fetch.as_str(), "fetch");
        assert_eq!(CacheOperation::Invalidate.as_str(), "invalidate");
    }

    #[test]
    fn test_noop_metrics() {
        let metrics = NoopMetrics;
        metrics.record_hit("featured", CacheTier::Memory);
        metrics.record_miss("featured");
        metrics.record_latency(CacheOperation::Get, Duration::from_millis(1));
        metrics.record_eviction(EvictionReason::Invalidated, 3);
    }

    #[cfg(feature = "metrics")]
    mod adapter {
        use crate::{CacheMetrics, CacheOperation, CacheTier, EvictionReason, MetricsCrateAdapter};
        use metrics::{
            Counter, CounterFn, Gauge, Histogram, HistogramFn, Key, KeyName, Metadata, Recorder,
            SharedString, Unit,
        };
        use parking_lot::Mutex;
        use std::collections::BTreeMap;
        use std::sync::Arc;
        use std::time::Duration;

        #[derive(Default)]
        struct Recorded {
            counters: Mutex<BTreeMap<String, u64>>,
            histograms: Mutex<Vec<String>>,
        }

        struct Handle {
            name: String,
            recorded: Arc<Recorded>,
        }

        impl CounterFn for Handle {
            fn increment(&self, value: u64) {
                *self.recorded.counters.lock().entry(self.name.clone()).or_default() += value;
            }

            fn absolute(&self, value: u64) {
                self.recorded.counters.lock().insert(self.name.clone(), value);
            }
        }

        impl HistogramFn for Handle {
            fn record(&self, _value: f64) {
                self.recorded.histograms.lock().push(self.name.clone());
            }
        }

        struct TestRecorder(Arc<Recorded>);

        impl TestRecorder {
            fn handle(&self, key: &Key) -> Arc<Handle> {
                let mut name = key.name().to_string();
                for label in key.labels() {
                    name.push_str(&format!("{{{}={}}}", label.key(), label.value()));
                }
                Arc::new(Handle {
                    name,
                    recorded: self.0.clone(),
                })
            }
        }

        impl Recorder for TestRecorder {
            fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
            fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
            fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

            fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
                Counter::from_arc(self.handle(key))
            }

            fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
                Gauge::noop()
            }

            fn register_histogram(&self, key: &Key, _: &Metadata<'_>) -> Histogram {
                Histogram::from_arc(self.handle(key))
            }
        }

        #[test]
        fn test_adapter_emits_prefixed_metrics() {
            let recorded = Arc::new(Recorded::default());
            let recorder = TestRecorder(recorded.clone());
            let adapter = MetricsCrateAdapter::new("storefront");

            metrics::with_local_recorder(&recorder, || {
                adapter.record_hit("featured", CacheTier::Memory);
                adapter.record_hit("featured", CacheTier::Memory);
                adapter.record_hit("categories", CacheTier::Persistent);
                adapter.record_miss("products:all");
                adapter.record_stale_hit("categories");
                adapter.record_eviction(EvictionReason::Invalidated, 4);
                adapter.record_latency(CacheOperation::Fetch, Duration::from_millis(12));
            });

            let counters = recorded.counters.lock();
            assert_eq!(counters["storefront_hits_total{tier=memory}"], 2);
            assert_eq!(counters["storefront_hits_total{tier=persistent}"], 1);
            assert_eq!(counters["storefront_misses_total"], 1);
            assert_eq!(counters["storefront_stale_hits_total"], 1);
            assert_eq!(counters["storefront_evictions_total{reason=invalidated}"], 4);
            assert_eq!(
                *recorded.histograms.lock(),
                vec!["storefront_operation_duration_seconds{operation=fetch}".to_string()]
            );
        }
    }
}
