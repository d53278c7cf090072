//! Cache Module
//!
//! Provides byte-budgeted in-memory storage with LRU eviction.

mod byteview;
mod concurrent;
mod entry;
mod lru;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use byteview::ByteValue;
pub use concurrent::ConcurrentCache;
pub use entry::{entry_size, ByteSize, CacheEntry};
pub use lru::{RecencyList, SlotId};
pub use stats::CacheStats;
pub use store::{BoundedStore, EvictionObserver};

// == Public Constants ==
/// Default per-group byte budget (1 MiB)
pub const DEFAULT_CACHE_BYTES: usize = 1 << 20;
