//! Peer Client
//!
//! HTTP implementation of [`PeerGetter`].

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::group::PeerGetter;

// == HTTP Getter ==
/// Fetches values from one remote peer.
///
/// Requests go to `{base_url}{group}/{key}` with both segments
/// percent-encoded; `base_url` already ends with the peer's path prefix.
#[derive(Debug, Clone)]
pub struct HttpGetter {
    base_url: String,
    client: reqwest::Client,
}

impl HttpGetter {
    /// Creates a getter sharing `client` (and its timeout) with other peers.
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full request URL for a group/key pair.
    pub fn url_for(&self, group: &str, key: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url,
            urlencoding::encode(group),
            urlencoding::encode(key)
        )
    }
}

#[async_trait]
impl PeerGetter for HttpGetter {
    async fn get(&self, group: &str, key: &str) -> Result<Vec<u8>> {
        let url = self.url_for(group, key);
        debug!(%url, "fetching from peer");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CacheError::Transport(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(CacheError::Transport(format!(
                "server returned: {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CacheError::Transport(format!("reading response body: {}", e)))?;
        Ok(bytes.to_vec())
    }
}
