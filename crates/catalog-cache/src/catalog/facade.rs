//! Storefront-facing catalog cache

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Instant;

use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use catalog_cache_core::{
    CacheKey, CacheMetrics, CacheOperation, CacheRead, CacheStats, Clock, DurableStore,
    EvictionReason, NoopMetrics, Result, SystemClock, namespaced,
};
use catalog_cache_storage::PersistentTier;

use super::fetcher::CatalogFetcher;
use super::keys::{CatalogResource, ProductFilter};
use super::model::{CatalogRead, Category, Product};
use crate::config::CatalogCacheConfig;
use crate::manager::{TierContext, TieredCache};
use crate::source::{CatalogSource, RestCatalogSource};

/// Read-through cache for the product catalog
///
/// Every read is total: failures are logged and surface as an empty listing
/// with `from_cache == false`. Cloning creates a new handle to the SAME
/// cache.
///
/// # Example
/// ```ignore
/// use std::sync::Arc;
/// use catalog_cache::{CatalogCache, FileStore};
///
/// let store = Arc::new(FileStore::open("catalog.json")?);
/// let cache = CatalogCache::from_env(store, Default::default());
/// cache.prefetch_products();
///
/// let listing = cache.get_products(Some("gas-reducers")).await;
/// ```
pub struct CatalogCache<S, M = NoopMetrics> {
    fetcher: Option<CatalogFetcher<S>>,
    products: TieredCache<Vec<Product>, M>,
    categories: TieredCache<Vec<Category>, M>,
    ctx: TierContext<M>,
    config: Arc<CatalogCacheConfig>,
}

impl<S, M> Clone for CatalogCache<S, M> {
    fn clone(&self) -> Self {
        Self {
            fetcher: self.fetcher.clone(),
            products: self.products.clone(),
            categories: self.categories.clone(),
            ctx: self.ctx.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S: CatalogSource> CatalogCache<S> {
    /// Create a cache over `source` with default config
    pub fn new(source: S, store: Arc<dyn DurableStore>) -> Self {
        Self::with_config(Some(source), store, CatalogCacheConfig::default())
    }

    /// Create a cache; `None` means the remote source is not configured
    pub fn with_config(
        source: Option<S>,
        store: Arc<dyn DurableStore>,
        config: CatalogCacheConfig,
    ) -> Self {
        Self::with_parts(source, store, config, Arc::new(SystemClock), NoopMetrics)
    }
}

impl CatalogCache<RestCatalogSource> {
    /// Create a cache over the REST source described by the environment
    ///
    /// Missing variables (or an unusable HTTP client) leave the cache
    /// unconfigured: every read returns an empty listing.
    pub fn from_env(store: Arc<dyn DurableStore>, config: CatalogCacheConfig) -> Self {
        let source = match RestCatalogSource::from_env() {
            Some(Ok(source)) => Some(source),
            Some(Err(e)) => {
                warn!(target: "catalog_cache", error = %e, "remote source unusable, catalog disabled");
                None
            }
            None => {
                warn!(target: "catalog_cache", "remote source not configured, catalog disabled");
                None
            }
        };
        Self::with_config(source, store, config)
    }
}

impl<S: CatalogSource, M: CacheMetrics> CatalogCache<S, M> {
    /// Create a cache with an explicit clock and metrics sink
    pub fn with_parts(
        source: Option<S>,
        store: Arc<dyn DurableStore>,
        config: CatalogCacheConfig,
        clock: Arc<dyn Clock>,
        metrics: M,
    ) -> Self {
        let ctx = TierContext {
            persistent: PersistentTier::new(store),
            policy: config.policy(),
            clock,
            metrics: Arc::new(metrics),
            stats: Arc::new(RwLock::new(CacheStats::default())),
            generation: Arc::default(),
            coalesce: config.coalesce,
        };

        Self {
            fetcher: source.map(|s| CatalogFetcher::new(Arc::new(s))),
            products: TieredCache::new(ctx.clone()),
            categories: TieredCache::new(ctx.clone()),
            ctx,
            config: Arc::new(config),
        }
    }

    /// Whether a remote source is configured
    pub fn is_configured(&self) -> bool {
        self.fetcher.is_some()
    }

    pub fn config(&self) -> &CatalogCacheConfig {
        &self.config
    }

    /// Full durable-store key for `resource`
    pub fn storage_key(&self, resource: &CatalogResource) -> String {
        namespaced(&self.config.namespace, &resource.cache_key())
    }

    /// Featured products, newest first
    pub async fn get_featured_products(&self) -> CatalogRead<Product> {
        let Some(fetcher) = self.fetcher.clone() else {
            return CacheRead::empty();
        };
        self.read(&self.products, CatalogResource::Featured, move || {
            let fetcher = fetcher.clone();
            async move { fetcher.featured().await }
        })
        .await
    }

    /// Products by name; `None`, `""` and `"all"` list every product
    pub async fn get_products(&self, category: Option<&str>) -> CatalogRead<Product> {
        let Some(fetcher) = self.fetcher.clone() else {
            return CacheRead::empty();
        };
        let filter = ProductFilter::from_slug(category);
        let resource = CatalogResource::Products(filter.clone());
        self.read(&self.products, resource, move || {
            let fetcher = fetcher.clone();
            let filter = filter.clone();
            async move { fetcher.products(&filter).await }
        })
        .await
    }

    /// Categories in display order
    pub async fn get_categories(&self) -> CatalogRead<Category> {
        let Some(fetcher) = self.fetcher.clone() else {
            return CacheRead::empty();
        };
        self.read(&self.categories, CatalogResource::Categories, move || {
            let fetcher = fetcher.clone();
            async move { fetcher.categories().await }
        })
        .await
    }

    async fn read<V, F, Fut>(
        &self,
        cache: &TieredCache<Vec<V>, M>,
        resource: CatalogResource,
        fetch: F,
    ) -> CatalogRead<V>
    where
        V: Clone + serde::Serialize + serde::de::DeserializeOwned + Send + Sync + 'static,
        F: Fn() -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<V>>> + Send + 'static,
    {
        let key = self.storage_key(&resource);
        match cache.get_or_fetch(&key, fetch).await {
            Ok(read) => read,
            Err(e) => {
                warn!(target: "catalog_cache", key = %key, error = %e, remote = e.is_remote(), "catalog fetch failed, serving empty listing");
                CacheRead::empty()
            }
        }
    }

    /// Drop every cached catalog entry from both tiers
    ///
    /// Call after any mutation of products or categories. Entries outside
    /// this cache's namespace are left alone. Fetches already in flight
    /// will not write their (possibly outdated) result.
    pub fn clear_product_cache(&self) {
        let start = Instant::now();
        self.ctx.generation.fetch_add(1, Ordering::SeqCst);

        let memory = self.products.clear_memory() + self.categories.clear_memory();
        let persisted = self.ctx.persistent.clear_namespace(&self.config.namespace);

        self.ctx.stats.write().invalidations += 1;
        self.ctx
            .metrics
            .record_eviction(EvictionReason::Invalidated, memory as u64 + persisted);
        self.ctx
            .metrics
            .record_latency(CacheOperation::Invalidate, start.elapsed());
        debug!(target: "catalog_cache", memory, persisted, "catalog cache cleared");
    }

    /// Warm featured products, categories and the full product list
    ///
    /// Runs detached; the handle may be dropped.
    pub fn prefetch_products(&self) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            let (featured, categories, products) = tokio::join!(
                cache.get_featured_products(),
                cache.get_categories(),
                cache.get_products(None),
            );
            debug!(
                target: "catalog_cache",
                featured = featured.value.len(),
                categories = categories.value.len(),
                products = products.value.len(),
                "catalog prefetch finished"
            );
        })
    }

    /// Snapshot of the cache counters
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.ctx.stats.read().clone();
        stats.size = self.products.len() + self.categories.len();
        stats
    }

    /// Background refreshes still running
    pub fn pending_refreshes(&self) -> usize {
        self.products.pending_refreshes() + self.categories.pending_refreshes()
    }

    /// Whether the memory tier holds `resource`
    pub fn is_memory_cached(&self, resource: &CatalogResource) -> bool {
        let key = self.storage_key(resource);
        match resource {
            CatalogResource::Categories => self.categories.contains(&key),
            _ => self.products.contains(&key),
        }
    }
}
