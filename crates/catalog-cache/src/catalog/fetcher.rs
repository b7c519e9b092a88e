//! Remote fetcher: builds queries and normalizes rows into records

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use catalog_cache_core::Result;

use super::keys::ProductFilter;
use super::model::{Category, Product};
use crate::source::{CatalogSource, CategoryQuery, CategoryRow, OrderBy, ProductQuery, ProductRow};

/// Per-resource fetch functions over a [`CatalogSource`]
pub struct CatalogFetcher<S> {
    source: Arc<S>,
}

impl<S> Clone for CatalogFetcher<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
        }
    }
}

impl<S: CatalogSource> CatalogFetcher<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Featured products, newest first
    pub async fn featured(&self) -> Result<Vec<Product>> {
        let query = ProductQuery {
            featured_only: true,
            category_id: None,
            order: vec![OrderBy::desc("created_at")],
        };
        let rows = self.source.query_products(&query).await?;
        Ok(rows.into_iter().map(normalize_product).collect())
    }

    /// Products by name, optionally limited to one category
    ///
    /// An unknown category slug is an empty listing, not an error.
    pub async fn products(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        let category_id = match filter.slug() {
            None => None,
            Some(slug) => match self.source.find_category_id(slug).await? {
                Some(id) => Some(id),
                None => {
                    debug!(target: "catalog_cache", slug = %slug, "unknown category slug");
                    return Ok(Vec::new());
                }
            },
        };

        let query = ProductQuery {
            featured_only: false,
            category_id,
            order: vec![OrderBy::asc("name")],
        };
        let rows = self.source.query_products(&query).await?;
        Ok(rows.into_iter().map(normalize_product).collect())
    }

    /// Categories in display order
    pub async fn categories(&self) -> Result<Vec<Category>> {
        let query = CategoryQuery {
            order: vec![OrderBy::asc("sort_order"), OrderBy::asc("name")],
        };
        let rows = self.source.query_categories(&query).await?;
        Ok(rows.into_iter().map(normalize_category).collect())
    }
}

fn normalize_product(row: ProductRow) -> Product {
    let category = row.categories.unwrap_or_default();
    Product {
        id: row.id,
        name: row.name.unwrap_or_default(),
        description: row.description.unwrap_or_default(),
        price: row.price.unwrap_or(0.0),
        image_url: row.image_url.unwrap_or_default(),
        category_slug: category.slug.unwrap_or_default(),
        category_name: category.name.unwrap_or_default(),
        brand: row.brand.unwrap_or_default(),
        featured: row.is_featured.unwrap_or(false),
        in_stock: row.in_stock.unwrap_or(true),
        specifications: normalize_specifications(row.specifications),
    }
}

/// Flatten a JSON object into a string map; anything else is empty
fn normalize_specifications(value: Option<serde_json::Value>) -> BTreeMap<String, String> {
    let Some(serde_json::Value::Object(map)) = value else {
        return BTreeMap::new();
    };
    map.into_iter()
        .filter_map(|(k, v)| match v {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some((k, s)),
            other => Some((k, other.to_string())),
        })
        .collect()
}

fn normalize_category(row: CategoryRow) -> Category {
    Category {
        id: row.id,
        slug: row.slug.unwrap_or_default(),
        name: row.name.unwrap_or_default(),
        description: row.description.unwrap_or_default(),
        image_url: row.image_url.unwrap_or_default(),
        sort_order: row.sort_order.unwrap_or(0),
    }
}
