//! Durable key-value store trait

use crate::CacheError;

/// Synchronous string key-value store that survives restarts
///
/// This is the storage the persistent tier sits on. It may be shared with
/// other subsystems, so callers must only touch keys they own. Every
/// operation is synchronous; none of them suspend.
pub trait DurableStore: Send + Sync + 'static {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Remove `key`
    ///
    /// Returns `true` if the key existed.
    fn remove(&self, key: &str) -> Result<bool, CacheError>;

    /// List every key currently stored
    fn keys(&self) -> Result<Vec<String>, CacheError>;

    /// Remove every key starting with `prefix`
    ///
    /// Returns the number of keys removed.
    fn remove_prefixed(&self, prefix: &str) -> Result<u64, CacheError> {
        let mut count = 0;
        for key in self.keys()? {
            if key.starts_with(prefix) && self.remove(&key)? {
                count += 1;
            }
        }
        Ok(count)
    }
}
