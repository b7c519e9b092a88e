//! Error types for cache operations

use thiserror::Error;

/// Main error type for all cache operations
///
/// None of these ever reach a facade caller; they exist so the failure
/// boundaries can log what went wrong before degrading to an empty result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    /// Serialization failed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization failed
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Durable store read/write failed
    #[error("storage error: {0}")]
    Storage(String),

    /// Durable store is full
    #[error("storage quota exceeded: {needed} bytes needed, {available} available")]
    QuotaExceeded { needed: usize, available: usize },

    /// Remote source could not be reached
    #[error("connection error: {0}")]
    Connection(String),

    /// Remote source rejected or failed the query
    #[error("remote query failed: {0}")]
    Remote(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// Whether the error came from the remote source rather than a local tier
    pub fn is_remote(&self) -> bool {
        matches!(self, CacheError::Connection(_) | CacheError::Remote(_))
    }
}

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;
