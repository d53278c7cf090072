//! Peercache - A distributed read-through cache
//!
//! Groups of byte values, loaded on miss by an application loader, sharded
//! across peers with consistent hashing and kept in byte-budgeted LRU stores.

pub mod cache;
pub mod config;
pub mod error;
pub mod group;
pub mod models;
pub mod ring;
pub mod transport;

pub use cache::ByteValue;
pub use config::Config;
pub use error::{CacheError, Result};
pub use group::{Group, GroupRegistry, Loader, LoaderFn, PeerGetter, PeerPicker};
pub use ring::HashRing;
pub use transport::{create_router, AppState, HttpPool};
