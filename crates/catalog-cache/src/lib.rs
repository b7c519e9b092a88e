//! catalog-cache: Read-through cache for a storefront product catalog
//!
//! # Features
//!
//! - **Two tiers**: process memory plus a durable store that survives restarts
//! - **Stale-while-revalidate**: persisted entries are served instantly and
//!   refreshed in the background
//! - **Per-resource keys**: featured products, categories, all products and
//!   products by category each keep their own freshness clock
//! - **Stampede protection**: concurrent misses share one remote fetch
//! - **Total API**: failures degrade to empty listings, never errors
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use catalog_cache::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(FileStore::open("catalog-cache.json")?);
//!     let cache = CatalogCache::from_env(store, CatalogCacheConfig::default());
//!     cache.prefetch_products();
//!
//!     let listing = cache.get_products(Some("gas-reducers")).await;
//!     println!("{} products (cached: {})", listing.value.len(), listing.from_cache);
//!
//!     // after an admin edit
//!     cache.clear_product_cache();
//!     Ok(())
//! }
//! ```

mod catalog;
mod config;
mod manager;
mod source;

// Re-export core
pub use catalog_cache_core::*;

// Re-export storage
pub use catalog_cache_storage::{FileStore, MemoryStore};

pub use catalog::{
    CatalogCache, CatalogFetcher, CatalogRead, CatalogResource, Category, Product, ProductFilter,
};
pub use config::{CatalogCacheConfig, DEFAULT_NAMESPACE};
pub use source::{
    CatalogSource, CategoryQuery, CategoryRef, CategoryRow, OrderBy, ProductQuery, ProductRow,
    RestCatalogSource, RestSourceConfig,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        CacheError, CacheStats, CatalogCache, CatalogCacheConfig, CatalogRead, CatalogResource,
        CatalogSource, Category, Clock, DurableStore, FileStore, ManualClock, MemoryStore,
        NoopMetrics, Product, ProductFilter, RestCatalogSource, RestSourceConfig, Result,
        SystemClock, TracingMetrics,
    };

    #[cfg(feature = "metrics")]
    pub use crate::MetricsCrateAdapter;
}

#[cfg(test)]
mod testing;
