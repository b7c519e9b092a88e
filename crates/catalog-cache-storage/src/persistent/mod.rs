//! Persistent cache tier and the durable stores it can sit on

mod file_store;
mod memory_store;
mod tier;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use tier::PersistentTier;
