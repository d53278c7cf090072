//! Configuration Module
//!
//! Handles loading and managing node configuration from environment variables.

use std::env;

use crate::cache::DEFAULT_CACHE_BYTES;
use crate::ring::DEFAULT_REPLICAS;
use crate::transport::DEFAULT_BASE_PATH;

/// Node configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// This node's base URL as the other peers reach it
    pub self_url: String,
    /// Base URLs of all peers; may or may not list `self_url`
    pub peer_urls: Vec<String>,
    /// HTTP server port
    pub server_port: u16,
    /// Byte budget of each group's local cache
    pub cache_bytes: usize,
    /// Path prefix of the peer protocol
    pub base_path: String,
    /// Virtual nodes per peer on the hash ring
    pub replicas: usize,
    /// Timeout for one peer request in milliseconds
    pub peer_timeout_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SELF_URL` - This node's URL (default: http://127.0.0.1:8001)
    /// - `PEERS` - Comma-separated peer URLs (default: none besides self)
    /// - `SERVER_PORT` - HTTP server port (default: 8001)
    /// - `CACHE_BYTES` - Per-group byte budget (default: 1 MiB)
    /// - `BASE_PATH` - Peer protocol prefix (default: /_peercache/)
    /// - `REPLICAS` - Virtual nodes per peer (default: 50)
    /// - `PEER_TIMEOUT_MS` - Peer request timeout (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            self_url: env::var("SELF_URL")
                .map(|v| peer_url(&v).to_string())
                .unwrap_or(defaults.self_url),
            peer_urls: env::var("PEERS")
                .map(|v| parse_peer_list(&v))
                .unwrap_or(defaults.peer_urls),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cache_bytes: parse_var("CACHE_BYTES").unwrap_or(defaults.cache_bytes),
            base_path: env::var("BASE_PATH").unwrap_or(defaults.base_path),
            replicas: parse_var("REPLICAS").unwrap_or(defaults.replicas),
            peer_timeout_ms: parse_var("PEER_TIMEOUT_MS").unwrap_or(defaults.peer_timeout_ms),
        }
    }

    /// All peers on the ring, this node included, without duplicates.
    pub fn peers(&self) -> Vec<String> {
        let mut peers = vec![peer_url(&self.self_url).to_string()];
        for peer in self.peer_urls.iter().map(|p| peer_url(p)) {
            if !peers.iter().any(|known| known == peer) {
                peers.push(peer.to_string());
            }
        }
        peers
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            self_url: "http://127.0.0.1:8001".to_string(),
            peer_urls: Vec::new(),
            server_port: 8001,
            cache_bytes: DEFAULT_CACHE_BYTES,
            base_path: DEFAULT_BASE_PATH.to_string(),
            replicas: DEFAULT_REPLICAS,
            peer_timeout_ms: 3000,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

/// A peer's base URL as used on the ring: no surrounding blanks or trailing `/`.
pub(crate) fn peer_url(url: &str) -> &str {
    url.trim().trim_end_matches('/')
}

/// Splits a comma-separated list, dropping blanks and trailing slashes.
fn parse_peer_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(peer_url)
        .filter(|peer| !peer.is_empty())
        .map(str::to_string)
        .collect()
}
