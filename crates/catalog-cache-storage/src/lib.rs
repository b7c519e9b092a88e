//! catalog-cache-storage: Memory and persistent tiers for catalog-cache

pub mod memory;
pub mod persistent;

pub use memory::MemoryTier;
pub use persistent::{FileStore, MemoryStore, PersistentTier};
