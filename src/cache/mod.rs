// Cache module

pub mod disk;
pub mod entry;
pub mod error;
pub mod memory;
pub mod stats;
pub mod traits;

pub use disk::DiskStore;
pub use entry::{CacheEntry, CacheKey};
pub use error::CacheError;
pub use memory::MemoryStore;
pub use stats::CacheStats;
pub use traits::CacheStore;
