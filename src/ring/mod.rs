//! Ring Module
//!
//! Consistent-hash routing of keys to owning peers.

mod hash_ring;

pub use hash_ring::{crc32, HashFn, HashRing};

// == Public Constants ==
/// Default number of virtual nodes per owner
pub const DEFAULT_REPLICAS: usize = 50;
