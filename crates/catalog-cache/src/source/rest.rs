//! PostgREST catalog source

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::trace;

use catalog_cache_core::{CacheError, Result};

use super::{
    CatalogSource, CategoryQuery, CategoryRow, OrderBy, ProductQuery, ProductRow,
    RestSourceConfig,
};

/// Columns requested for products, including the embedded category
const PRODUCT_SELECT: &str = "*,categories(slug,name)";

/// [`CatalogSource`] backed by a Supabase/PostgREST HTTP API
#[derive(Debug, Clone)]
pub struct RestCatalogSource {
    client: Client,
    config: RestSourceConfig,
}

#[derive(Deserialize)]
struct IdRow {
    #[serde(deserialize_with = "super::lenient_id")]
    id: String,
}

impl RestCatalogSource {
    /// Build a source from `config`
    pub fn new(config: RestSourceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CacheError::Connection(format!("failed to build http client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Build a source from the environment, `None` if unconfigured
    pub fn from_env() -> Option<Result<Self>> {
        RestSourceConfig::from_env().map(Self::new)
    }

    pub fn config(&self) -> &RestSourceConfig {
        &self.config
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let url = self.config.table_url(table);
        trace!(target: "catalog_cache", url = %url, ?params, "querying remote source");

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.config.api_key)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Accept", "application/json")
            .query(params)
            .send()
            .await
            .map_err(|e| CacheError::Connection(format!("{table}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CacheError::Remote(format!(
                "{table} query failed with status {status}: {body}"
            )));
        }

        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| CacheError::Deserialization(format!("{table}: {e}")))
    }
}

/// `order=a.asc,b.desc`
fn order_param(order: &[OrderBy]) -> Option<(&'static str, String)> {
    if order.is_empty() {
        return None;
    }
    let terms: Vec<String> = order
        .iter()
        .map(|o| format!("{}.{}", o.column, if o.ascending { "asc" } else { "desc" }))
        .collect();
    Some(("order", terms.join(",")))
}

#[async_trait]
impl CatalogSource for RestCatalogSource {
    async fn query_products(&self, query: &ProductQuery) -> Result<Vec<ProductRow>> {
        let mut params = vec![("select", PRODUCT_SELECT.to_string())];
        if query.featured_only {
            params.push(("is_featured", "eq.true".to_string()));
        }
        if let Some(id) = &query.category_id {
            params.push(("category_id", format!("eq.{id}")));
        }
        params.extend(order_param(&query.order));

        self.select(&self.config.products_table, &params).await
    }

    async fn find_category_id(&self, slug: &str) -> Result<Option<String>> {
        let params = [
            ("select", "id".to_string()),
            ("slug", format!("eq.{slug}")),
            ("limit", "1".to_string()),
        ];
        let rows: Vec<IdRow> = self.select(&self.config.categories_table, &params).await?;
        Ok(rows.into_iter().next().map(|row| row.id))
    }

    async fn query_categories(&self, query: &CategoryQuery) -> Result<Vec<CategoryRow>> {
        let mut params = vec![("select", "*".to_string())];
        params.extend(order_param(&query.order));

        self.select(&self.config.categories_table, &params).await
    }
}
