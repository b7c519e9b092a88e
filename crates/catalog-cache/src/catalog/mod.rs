//! Catalog domain: records, keys, fetcher and the storefront facade

mod facade;
mod fetcher;
mod keys;
mod model;

pub use facade::CatalogCache;
pub use fetcher::CatalogFetcher;
pub use keys::{CatalogResource, ProductFilter};
pub use model::{CatalogRead, Category, Product};
