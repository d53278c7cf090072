//! Peer Pool
//!
//! Ring-backed [`PeerPicker`] that hands out one [`HttpGetter`] per peer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::{debug, info};

use crate::config::{peer_url, Config};
use crate::error::{CacheError, Result};
use crate::group::{PeerGetter, PeerPicker};
use crate::ring::{HashRing, DEFAULT_REPLICAS};
use crate::transport::{normalize_base_path, HttpGetter, DEFAULT_BASE_PATH};

// == Pool Options ==
/// Settings shared by every peer connection of a pool.
#[derive(Debug, Clone)]
pub struct PoolOptions {
    /// Path prefix peers serve the cache under, e.g. `/_peercache/`
    pub base_path: String,
    /// Virtual nodes per peer on the ring
    pub replicas: usize,
    /// Upper bound on one peer request, connect through body
    pub peer_timeout: Duration,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.to_string(),
            replicas: DEFAULT_REPLICAS,
            peer_timeout: Duration::from_secs(3),
        }
    }
}

#[derive(Debug)]
struct PoolState {
    ring: HashRing,
    getters: HashMap<String, Arc<HttpGetter>>,
}

// == HTTP Pool ==
/// Knows this process's own URL and every peer's, and routes keys between them.
#[derive(Debug)]
pub struct HttpPool {
    self_url: String,
    options: PoolOptions,
    client: reqwest::Client,
    state: Mutex<PoolState>,
}

impl HttpPool {
    // == Constructor ==
    /// Creates a pool with no peers.
    ///
    /// # Arguments
    /// * `self_url` - This peer's base URL, e.g. `http://10.0.0.1:8001`
    /// * `options` - Path prefix, replica count and request timeout
    pub fn new(self_url: impl Into<String>, options: PoolOptions) -> Result<Self> {
        let options = PoolOptions {
            base_path: normalize_base_path(&options.base_path)?,
            ..options
        };
        let self_url: String = self_url.into();
        let ring = HashRing::new(options.replicas, None)?;
        let client = reqwest::Client::builder()
            .timeout(options.peer_timeout)
            .build()
            .map_err(|e| CacheError::InvalidConfig(format!("peer client: {}", e)))?;

        Ok(Self {
            self_url: peer_url(&self_url).to_string(),
            options,
            client,
            state: Mutex::new(PoolState {
                ring,
                getters: HashMap::new(),
            }),
        })
    }

    /// Creates a pool from configuration and installs the configured peers.
    pub fn from_config(config: &Config) -> Result<Self> {
        let pool = Self::new(
            config.self_url.clone(),
            PoolOptions {
                base_path: config.base_path.clone(),
                replicas: config.replicas,
                peer_timeout: Duration::from_millis(config.peer_timeout_ms),
            },
        )?;
        pool.set_peers(config.peers())?;
        Ok(pool)
    }

    // == Set Peers ==
    /// Replaces the peer set: rebuilds the ring and one getter per peer.
    ///
    /// The list should include this process's own URL so that it owns its
    /// share of the keys.
    pub fn set_peers<I, S>(&self, peers: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let peers: Vec<String> = peers
            .into_iter()
            .map(|peer| {
                let peer: String = peer.into();
                peer_url(&peer).to_string()
            })
            .collect();
        let mut ring = HashRing::new(self.options.replicas, None)?;
        ring.add(&peers);

        let getters = peers
            .iter()
            .map(|peer| {
                let getter = HttpGetter::new(
                    format!("{}{}", peer, self.options.base_path),
                    self.client.clone(),
                );
                (peer.clone(), Arc::new(getter))
            })
            .collect();

        *self.lock() = PoolState { ring, getters };
        info!(self_url = %self.self_url, peers = ?peers, "peer set updated");
        Ok(())
    }

    pub fn self_url(&self) -> &str {
        &self.self_url
    }

    pub fn base_path(&self) -> &str {
        &self.options.base_path
    }

    /// Peer URLs currently on the ring.
    pub fn peers(&self) -> Vec<String> {
        self.lock()
            .ring
            .owners()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Ring owner for `key`, which may be this process.
    pub fn owner_of(&self, key: &str) -> Option<String> {
        self.lock().ring.get(key).map(str::to_string)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PeerPicker for HttpPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let state = self.lock();
        let owner = state.ring.get(key)?;
        if owner == self.self_url {
            return None;
        }
        debug!(self_url = %self.self_url, peer = %owner, key, "picked peer");
        let getter: Arc<dyn PeerGetter> = state.getters.get(owner)?.clone();
        Some(getter)
    }
}
