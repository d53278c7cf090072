//! Transport Module
//!
//! HTTP peer protocol: the client side picks and queries owning peers, the
//! server side answers peers' requests from local groups.
//!
//! # Wire protocol
//! `GET {peer}{base_path}{group}/{key}` with both segments percent-encoded.
//! - 200 with the raw value bytes
//! - 400 when the path does not split into a group and a key
//! - 404 when the group is unknown
//! - 500 with a plain-text message when the loader fails

mod client;
pub mod handlers;
mod pool;
pub mod routes;

pub use client::HttpGetter;
pub use handlers::AppState;
pub use pool::{HttpPool, PoolOptions};
pub use routes::create_router;

use crate::error::{CacheError, Result};

// == Public Constants ==
/// Default path prefix of the peer protocol
pub const DEFAULT_BASE_PATH: &str = "/_peercache/";

/// Ensures a path prefix starts and ends with `/` and is not the root.
pub fn normalize_base_path(base_path: &str) -> Result<String> {
    let trimmed = base_path.trim_matches('/');
    if trimmed.is_empty() {
        return Err(CacheError::InvalidConfig(
            "base path must not be empty or the root".to_string(),
        ));
    }
    Ok(format!("/{}/", trimmed))
}
