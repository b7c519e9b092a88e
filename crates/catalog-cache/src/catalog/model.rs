//! Normalized catalog records

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use catalog_cache_core::CacheRead;

/// A product as the storefront renders it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
    pub category_slug: String,
    pub category_name: String,
    pub brand: String,
    pub featured: bool,
    pub in_stock: bool,
    /// Free-form spec sheet, e.g. `"pressure" => "1.2 bar"`
    pub specifications: BTreeMap<String, String>,
}

impl Default for Product {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            description: String::new(),
            price: 0.0,
            image_url: String::new(),
            category_slug: String::new(),
            category_name: String::new(),
            brand: String::new(),
            featured: false,
            in_stock: true,
            specifications: BTreeMap::new(),
        }
    }
}

/// A product category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub sort_order: i32,
}

/// Records handed to the storefront, tagged with where they came from
pub type CatalogRead<T> = CacheRead<Vec<T>>;
