//! In-memory cache tier

mod tier;

pub use tier::MemoryTier;
