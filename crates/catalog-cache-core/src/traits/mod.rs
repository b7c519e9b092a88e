//! Core traits for cache operations

mod clock;
mod key;
mod metrics;
mod serializer;
mod store;
mod tracing_metrics;

pub use self::clock::{Clock, ManualClock, SystemClock};
pub use self::key::{CacheKey, KEY_SEPARATOR, namespace_prefix, namespaced};
pub use self::metrics::{CacheMetrics, CacheOperation, CacheTier, EvictionReason, NoopMetrics};
pub use self::serializer::{JsonSerializer, Serializer};
pub use self::store::DurableStore;
pub use self::tracing_metrics::{DEFAULT_SLOW_OPERATION, TracingMetrics};

#[cfg(feature = "metrics")]
pub use self::metrics::MetricsCrateAdapter;
