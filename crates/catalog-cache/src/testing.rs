//! Scripted in-memory catalog source for tests

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use catalog_cache_core::{CacheError, Result};

use crate::source::{
    CatalogSource, CategoryQuery, CategoryRef, CategoryRow, ProductQuery, ProductRow,
};

#[derive(Default)]
struct Tables {
    // (category id, row)
    products: Vec<(String, ProductRow)>,
    categories: Vec<CategoryRow>,
    product_queries: Vec<ProductQuery>,
    category_queries: Vec<CategoryQuery>,
}

/// Catalog source whose rows, failures and latency are driven by the test
#[derive(Default)]
pub struct ScriptedSource {
    tables: Mutex<Tables>,
    failing: AtomicBool,
    gate: Mutex<Option<Arc<Semaphore>>>,
    product_calls: AtomicU32,
    category_calls: AtomicU32,
    lookup_calls: AtomicU32,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_category(&self, id: &str, slug: &str, name: &str) {
        self.tables.lock().categories.push(CategoryRow {
            id: id.into(),
            slug: Some(slug.into()),
            name: Some(name.into()),
            ..Default::default()
        });
    }

    /// Replace every category name, simulating an admin edit
    pub fn rename_categories(&self, name: &str) {
        for row in &mut self.tables.lock().categories {
            row.name = Some(name.into());
        }
    }

    pub fn add_product(&self, id: &str, name: &str, category_id: &str, featured: bool) {
        let mut tables = self.tables.lock();
        let category = tables
            .categories
            .iter()
            .find(|c| c.id == category_id)
            .map(|c| CategoryRef {
                slug: c.slug.clone(),
                name: c.name.clone(),
            });
        tables.products.push((
            category_id.into(),
            ProductRow {
                id: id.into(),
                name: Some(name.into()),
                is_featured: Some(featured),
                categories: category,
                ..Default::default()
            },
        ));
    }

    /// Make every query fail with a connection error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Block every query until [`release`](Self::release) is called
    pub fn hold(&self) {
        *self.gate.lock() = Some(Arc::new(Semaphore::new(0)));
    }

    /// Let `n` held queries through
    pub fn release(&self, n: usize) {
        if let Some(gate) = self.gate.lock().as_ref() {
            gate.add_permits(n);
        }
    }

    pub fn product_calls(&self) -> u32 {
        self.product_calls.load(Ordering::SeqCst)
    }

    pub fn category_calls(&self) -> u32 {
        self.category_calls.load(Ordering::SeqCst)
    }

    pub fn lookup_calls(&self) -> u32 {
        self.lookup_calls.load(Ordering::SeqCst)
    }

    /// Remote calls of any kind
    pub fn total_calls(&self) -> u32 {
        self.product_calls() + self.category_calls() + self.lookup_calls()
    }

    pub fn product_queries(&self) -> Vec<ProductQuery> {
        self.tables.lock().product_queries.clone()
    }

    pub fn category_queries(&self) -> Vec<CategoryQuery> {
        self.tables.lock().category_queries.clone()
    }

    async fn respond(&self) -> Result<()> {
        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(CacheError::Connection("network unreachable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogSource for ScriptedSource {
    async fn query_products(&self, query: &ProductQuery) -> Result<Vec<ProductRow>> {
        self.product_calls.fetch_add(1, Ordering::SeqCst);
        self.tables.lock().product_queries.push(query.clone());
        self.respond().await?;

        let tables = self.tables.lock();
        Ok(tables
            .products
            .iter()
            .filter(|(_, row)| !query.featured_only || row.is_featured == Some(true))
            .filter(|(category_id, _)| {
                query
                    .category_id
                    .as_ref()
                    .is_none_or(|wanted| wanted == category_id)
            })
            .map(|(_, row)| row.clone())
            .collect())
    }

    async fn find_category_id(&self, slug: &str) -> Result<Option<String>> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        self.respond().await?;

        let tables = self.tables.lock();
        Ok(tables
            .categories
            .iter()
            .find(|c| c.slug.as_deref() == Some(slug))
            .map(|c| c.id.clone()))
    }

    async fn query_categories(&self, query: &CategoryQuery) -> Result<Vec<CategoryRow>> {
        self.category_calls.fetch_add(1, Ordering::SeqCst);
        self.tables.lock().category_queries.push(query.clone());
        self.respond().await?;

        Ok(self.tables.lock().categories.clone())
    }
}
