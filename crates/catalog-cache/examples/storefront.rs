//! Storefront startup: prefetch, browse, invalidate
//!
//! Run with `SUPABASE_URL` and `SUPABASE_ANON_KEY` set; without them every
//! listing is empty.
//!
//! ```sh
//! RUST_LOG=catalog_cache=debug cargo run --example storefront
//! ```

use std::sync::Arc;

use catalog_cache::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Durable tier in a local JSON file, remote source from the environment
    let store = Arc::new(FileStore::open("catalog-cache.json")?);
    let source = RestSourceConfig::from_env()
        .map(RestCatalogSource::new)
        .transpose()?;

    let cache = CatalogCache::with_parts(
        source,
        store,
        CatalogCacheConfig::default(),
        Arc::new(SystemClock),
        TracingMetrics::new().with_service_name("storefront"),
    );

    // 3. Warm the first-paint listings without waiting on them
    cache.prefetch_products();

    let categories = cache.get_categories().await;
    println!(
        "{} categories (from cache: {})",
        categories.value.len(),
        categories.from_cache
    );

    for category in &categories.value {
        let listing = cache.get_products(Some(&category.slug)).await;
        println!(
            "  {:<24} {:>3} products (from cache: {})",
            category.name,
            listing.value.len(),
            listing.from_cache
        );
    }

    let featured = cache.get_featured_products().await;
    for product in &featured.value {
        println!("  * {} ({:.2})", product.name, product.price);
    }

    // 4. An admin edit would call this
    cache.clear_product_cache();

    println!("\n{:#?}", cache.stats());
    Ok(())
}
