//! Remote catalog source seam
//!
//! Row types mirror what the remote tables return; every field is optional
//! so that schema drift degrades to defaults instead of failing a listing.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};

use catalog_cache_core::Result;

mod config;
mod rest;

pub use config::RestSourceConfig;
pub use rest::RestCatalogSource;

/// One `ORDER BY` term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: &'static str,
    pub ascending: bool,
}

impl OrderBy {
    pub fn asc(column: &'static str) -> Self {
        Self {
            column,
            ascending: true,
        }
    }

    pub fn desc(column: &'static str) -> Self {
        Self {
            column,
            ascending: false,
        }
    }
}

/// Filters and ordering for a products query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Only rows with `is_featured = true`
    pub featured_only: bool,
    /// Only rows with this `category_id`
    pub category_id: Option<String>,
    pub order: Vec<OrderBy>,
}

/// Ordering for a categories query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryQuery {
    pub order: Vec<OrderBy>,
}

/// Category fields embedded in a product row
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CategoryRef {
    pub slug: Option<String>,
    pub name: Option<String>,
}

/// Raw `products` row
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProductRow {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub brand: Option<String>,
    pub is_featured: Option<bool>,
    pub in_stock: Option<bool>,
    pub specifications: Option<serde_json::Value>,
    pub categories: Option<CategoryRef>,
}

/// Raw `categories` row
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CategoryRow {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    pub slug: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub sort_order: Option<i32>,
}

/// Accept ids as strings or numbers (uuid and serial keys both occur)
fn lenient_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// The remote system of record for products and categories
#[async_trait]
pub trait CatalogSource: Send + Sync + 'static {
    /// Run a products query
    async fn query_products(&self, query: &ProductQuery) -> Result<Vec<ProductRow>>;

    /// Resolve a category slug to its id; `Ok(None)` if no such category
    async fn find_category_id(&self, slug: &str) -> Result<Option<String>>;

    /// Run a categories query
    async fn query_categories(&self, query: &CategoryQuery) -> Result<Vec<CategoryRow>>;
}

#[async_trait]
impl<T: CatalogSource> CatalogSource for std::sync::Arc<T> {
    async fn query_products(&self, query: &ProductQuery) -> Result<Vec<ProductRow>> {
        (**self).query_products(query).await
    }

    async fn find_category_id(&self, slug: &str) -> Result<Option<String>> {
        (**self).find_category_id(slug).await
    }

    async fn query_categories(&self, query: &CategoryQuery) -> Result<Vec<CategoryRow>> {
        (**self).query_categories(query).await
    }
}
