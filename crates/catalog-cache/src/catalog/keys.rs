//! Cache keys for catalog resources

use std::fmt;

use catalog_cache_core::CacheKey;

/// Which products a listing asks for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProductFilter {
    /// Every product
    All,
    /// Products of one category, by slug
    Category(String),
}

impl ProductFilter {
    /// Build a filter from an optional category slug
    ///
    /// `None`, an empty slug and the literal `"all"` all mean unfiltered.
    pub fn from_slug(slug: Option<&str>) -> Self {
        match slug.map(str::trim) {
            None | Some("") | Some("all") => ProductFilter::All,
            Some(slug) => ProductFilter::Category(slug.to_string()),
        }
    }

    /// Category slug, if filtered
    pub fn slug(&self) -> Option<&str> {
        match self {
            ProductFilter::All => None,
            ProductFilter::Category(slug) => Some(slug),
        }
    }
}

/// A logical catalog resource; each one has its own cache key and TTL clock
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatalogResource {
    Featured,
    Categories,
    Products(ProductFilter),
}

impl CacheKey for CatalogResource {
    fn cache_key(&self) -> String {
        match self {
            CatalogResource::Featured => "featured".to_string(),
            CatalogResource::Categories => "categories".to_string(),
            CatalogResource::Products(ProductFilter::All) => "products:all".to_string(),
            CatalogResource::Products(ProductFilter::Category(slug)) => format!("products:{slug}"),
        }
    }
}

impl fmt::Display for CatalogResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cache_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys() {
        assert_eq!(CatalogResource::Featured.cache_key(), "featured");
        assert_eq!(CatalogResource::Categories.cache_key(), "categories");
        assert_eq!(
            CatalogResource::Products(ProductFilter::All).cache_key(),
            "products:all"
        );
        assert_eq!(
            CatalogResource::Products(ProductFilter::from_slug(Some("gas-reducers"))).cache_key(),
            "products:gas-reducers"
        );
    }

    #[test]
    fn test_filter_normalization() {
        assert_eq!(ProductFilter::from_slug(None), ProductFilter::All);
        assert_eq!(ProductFilter::from_slug(Some("")), ProductFilter::All);
        assert_eq!(ProductFilter::from_slug(Some("all")), ProductFilter::All);
        assert_eq!(ProductFilter::from_slug(Some(" ecu ")).slug(), Some("ecu"));
    }
}
