//! catalog-cache-core: Core traits and types for the catalog-cache library
//!
//! This crate provides the entry type, freshness policy and the seams
//! (durable store, clock, metrics, serializer) shared by the storage tiers
//! and the catalog facade.

mod error;
mod freshness;
mod traits;
mod types;

pub use error::{CacheError, Result};
pub use freshness::{DEFAULT_STALE_WINDOW, DEFAULT_TTL, Freshness, FreshnessPolicy};
pub use traits::*;
pub use types::*;
