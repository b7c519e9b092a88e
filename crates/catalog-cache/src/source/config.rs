//! REST source configuration

use std::time::Duration;

/// Environment variable holding the project URL
pub const URL_ENV: &str = "SUPABASE_URL";
/// Environment variable holding the anonymous API key
pub const API_KEY_ENV: &str = "SUPABASE_ANON_KEY";

/// Connection settings for [`RestCatalogSource`](super::RestCatalogSource)
#[derive(Debug, Clone)]
pub struct RestSourceConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    /// Sent both as `apikey` and as the bearer token
    pub api_key: String,
    /// Path of the REST API under `url`
    pub rest_path: String,
    pub products_table: String,
    pub categories_table: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl RestSourceConfig {
    /// Create config with default tables
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            rest_path: "/rest/v1".to_string(),
            products_table: "products".to_string(),
            categories_table: "categories".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Read `SUPABASE_URL` and `SUPABASE_ANON_KEY`
    ///
    /// Returns `None` when either is missing or blank, which means the remote
    /// source is not configured.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let url = lookup(URL_ENV).filter(|v| !v.trim().is_empty())?;
        let key = lookup(API_KEY_ENV).filter(|v| !v.trim().is_empty())?;
        Some(Self::new(url.trim(), key.trim()))
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Endpoint for `table`
    pub fn table_url(&self, table: &str) -> String {
        format!("{}{}/{}", self.url, self.rest_path, table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_from_lookup() {
        let config = RestSourceConfig::from_lookup(lookup(&[
            (URL_ENV, "https://demo.supabase.co/"),
            (API_KEY_ENV, "anon"),
        ]))
        .unwrap();

        assert_eq!(config.url, "https://demo.supabase.co");
        assert_eq!(
            config.table_url(&config.products_table),
            "https://demo.supabase.co/rest/v1/products"
        );
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_missing_or_blank_is_unconfigured() {
        assert!(RestSourceConfig::from_lookup(lookup(&[(URL_ENV, "https://x")])).is_none());
        assert!(
            RestSourceConfig::from_lookup(lookup(&[(URL_ENV, "https://x"), (API_KEY_ENV, "  ")]))
                .is_none()
        );
    }
}
