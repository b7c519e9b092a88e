//! Cache key trait

/// Separator between namespace and key parts
pub const KEY_SEPARATOR: char = ':';

/// Trait for types that can be used as cache keys
///
/// The namespace is applied by the cache, not the key.
pub trait CacheKey: Send + Sync {
    /// Generate the key string (without namespace)
    fn cache_key(&self) -> String;
}

/// Prefix shared by every key stored under `namespace`
pub fn namespace_prefix(namespace: &str) -> String {
    format!("{}{}", namespace, KEY_SEPARATOR)
}

/// Prefix `key` with `namespace`
pub fn namespaced(namespace: &str, key: &str) -> String {
    format!("{}{}", namespace_prefix(namespace), key)
}
