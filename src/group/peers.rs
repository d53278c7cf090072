//! Peer Capabilities
//!
//! The seams between a group and whatever transport reaches other peers.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

// == Peer Getter ==
/// Fetches a value for a group from one remote peer.
#[async_trait]
pub trait PeerGetter: Send + Sync {
    /// Returns the raw bytes the owning peer holds (or loads) for `key`.
    async fn get(&self, group: &str, key: &str) -> Result<Vec<u8>>;
}

// == Peer Picker ==
/// Resolves which peer owns a key.
pub trait PeerPicker: Send + Sync {
    /// Returns the getter for the owning peer, or `None` when this process
    /// owns the key (or knows no peers at all).
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}
