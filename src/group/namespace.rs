//! Namespace Module
//!
//! A named cache namespace: local cache, peer delegation and origin loads.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::{ByteValue, CacheStats, ConcurrentCache, DEFAULT_CACHE_BYTES};
use crate::error::{CacheError, Result};
use crate::group::{PeerGetter, PeerPicker, SingleFlight};

// == Loader ==
/// Fetches a value from the source of truth on a cache miss.
#[async_trait]
pub trait Loader: Send + Sync {
    async fn load(&self, key: &str) -> anyhow::Result<Vec<u8>>;
}

/// Adapts a plain closure into a [`Loader`].
pub struct LoaderFn<F>(pub F);

#[async_trait]
impl<F> Loader for LoaderFn<F>
where
    F: Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync,
{
    async fn load(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        (self.0)(key)
    }
}

// == Group Stats ==
/// Counters for one group, as served on the stats endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupStats {
    /// Group name
    pub name: String,
    /// Calls to `get`, including rejected ones
    pub gets: u64,
    /// Calls answered from the local cache
    pub cache_hits: u64,
    /// Values served by a remote owner
    pub peer_loads: u64,
    /// Remote fetches that failed and fell back to the loader
    pub peer_errors: u64,
    /// Values loaded from the origin
    pub local_loads: u64,
    /// Loader failures returned to callers
    pub loader_errors: u64,
    /// Local cache occupancy and counters
    pub cache: CacheStats,
}

#[derive(Debug, Default)]
struct Counters {
    gets: AtomicU64,
    cache_hits: AtomicU64,
    peer_loads: AtomicU64,
    peer_errors: AtomicU64,
    local_loads: AtomicU64,
    loader_errors: AtomicU64,
}

fn bump(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}

// == Group Builder ==
/// Collects a group's settings and validates them in [`GroupBuilder::build`].
pub struct GroupBuilder {
    name: String,
    cache_bytes: usize,
    loader: Option<Arc<dyn Loader>>,
}

impl GroupBuilder {
    /// Byte budget for the group's local cache (`0` = unbounded).
    pub fn cache_bytes(mut self, cache_bytes: usize) -> Self {
        self.cache_bytes = cache_bytes;
        self
    }

    /// Loader consulted when no cache has the key.
    pub fn loader(mut self, loader: impl Loader + 'static) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    /// Shorthand for `loader(LoaderFn(f))`.
    pub fn loader_fn<F>(self, f: F) -> Self
    where
        F: Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync + 'static,
    {
        self.loader(LoaderFn(f))
    }

    /// Validates the settings and creates the group.
    pub fn build(self) -> Result<Group> {
        if self.name.is_empty() {
            return Err(CacheError::InvalidConfig(
                "group name must not be empty".to_string(),
            ));
        }
        let loader = self
            .loader
            .ok_or_else(|| CacheError::MissingLoader(self.name.clone()))?;

        Ok(Group {
            main_cache: ConcurrentCache::new(self.cache_bytes),
            name: self.name,
            loader,
            peers: OnceLock::new(),
            flight: SingleFlight::new(),
            counters: Counters::default(),
        })
    }
}

// == Group ==
/// A cache namespace backed by a loader and optionally sharded across peers.
pub struct Group {
    name: String,
    loader: Arc<dyn Loader>,
    main_cache: ConcurrentCache,
    peers: OnceLock<Arc<dyn PeerPicker>>,
    flight: SingleFlight<Result<ByteValue>>,
    counters: Counters,
}

impl Group {
    // == Constructor ==
    /// Starts building a group with the default byte budget.
    pub fn builder(name: impl Into<String>) -> GroupBuilder {
        GroupBuilder {
            name: name.into(),
            cache_bytes: DEFAULT_CACHE_BYTES,
            loader: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // == Register Peers ==
    /// Attaches the picker used to route misses to owning peers.
    ///
    /// A group accepts exactly one picker; a second call is a setup bug and
    /// is reported as [`CacheError::PeersAlreadyRegistered`].
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) -> Result<()> {
        self.peers
            .set(peers)
            .map_err(|_| CacheError::PeersAlreadyRegistered(self.name.clone()))?;
        info!(group = %self.name, "peer picker registered");
        Ok(())
    }

    // == Get ==
    /// Returns the value for `key`.
    ///
    /// Order of resolution:
    /// 1. local cache
    /// 2. the owning peer, when the ring says another peer owns the key
    /// 3. the loader, whose result is stored in the local cache
    ///
    /// Peer failures are logged and fall through to the loader; only loader
    /// errors reach the caller. Concurrent misses on one key share one load.
    pub async fn get(&self, key: &str) -> Result<ByteValue> {
        bump(&self.counters.gets);
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }

        if let Some(value) = self.main_cache.get(key) {
            bump(&self.counters.cache_hits);
            debug!(group = %self.name, key, "cache hit");
            return Ok(value);
        }

        self.flight.run(key, || self.load(key)).await
    }

    async fn load(&self, key: &str) -> Result<ByteValue> {
        if let Some(peer) = self.peers.get().and_then(|picker| picker.pick_peer(key)) {
            match self.get_from_peer(peer.as_ref(), key).await {
                Ok(value) => {
                    bump(&self.counters.peer_loads);
                    return Ok(value);
                }
                Err(err) => {
                    bump(&self.counters.peer_errors);
                    warn!(group = %self.name, key, error = %err, "failed to get from peer, loading locally");
                }
            }
        }
        self.get_locally(key).await
    }

    /// Peer-served values are returned as-is and not kept locally: only the
    /// owner caches a key.
    async fn get_from_peer(&self, peer: &dyn PeerGetter, key: &str) -> Result<ByteValue> {
        let bytes = peer.get(&self.name, key).await?;
        Ok(ByteValue::from(bytes))
    }

    async fn get_locally(&self, key: &str) -> Result<ByteValue> {
        let bytes = self.loader.load(key).await.map_err(|err| {
            bump(&self.counters.loader_errors);
            CacheError::Loader(format!("{:#}", err))
        })?;
        bump(&self.counters.local_loads);

        let value = ByteValue::copy_from(&bytes);
        self.populate_cache(key, value.clone());
        Ok(value)
    }

    fn populate_cache(&self, key: &str, value: ByteValue) {
        self.main_cache.add(key, value);
    }

    // == Stats ==
    pub fn stats(&self) -> GroupStats {
        let c = &self.counters;
        GroupStats {
            name: self.name.clone(),
            gets: c.gets.load(Ordering::Relaxed),
            cache_hits: c.cache_hits.load(Ordering::Relaxed),
            peer_loads: c.peer_loads.load(Ordering::Relaxed),
            peer_errors: c.peer_errors.load(Ordering::Relaxed),
            local_loads: c.local_loads.load(Ordering::Relaxed),
            loader_errors: c.loader_errors.load(Ordering::Relaxed),
            cache: self.main_cache.stats(),
        }
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("cache_bytes", &self.main_cache.cache_bytes())
            .field("has_peers", &self.peers.get().is_some())
            .finish()
    }
}
