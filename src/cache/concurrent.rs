//! Concurrent Cache Module
//!
//! Thread-safe wrapper giving each group one lazily built bounded store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::cache::{BoundedStore, ByteValue, CacheStats};

#[derive(Debug, Default)]
struct Inner {
    store: Option<BoundedStore<ByteValue>>,
    stats: CacheStats,
}

// == Concurrent Cache ==
/// A [`BoundedStore`] of [`ByteValue`]s behind a single mutex.
///
/// Reads and writes take the same lock: a hit reorders the recency list, so
/// every access mutates. The store itself is only allocated on first write.
#[derive(Debug)]
pub struct ConcurrentCache {
    cache_bytes: usize,
    inner: Mutex<Inner>,
    evictions: Arc<AtomicU64>,
}

impl ConcurrentCache {
    // == Constructor ==
    /// Creates an empty cache with a byte budget (`0` = unbounded).
    pub fn new(cache_bytes: usize) -> Self {
        Self {
            cache_bytes,
            inner: Mutex::new(Inner::default()),
            evictions: Arc::new(AtomicU64::new(0)),
        }
    }

    // == Add ==
    /// Stores a value, building the underlying store if needed.
    pub fn add(&self, key: &str, value: ByteValue) {
        let mut inner = self.lock();
        let store = inner.store.get_or_insert_with(|| {
            let evictions = self.evictions.clone();
            BoundedStore::with_observer(
                self.cache_bytes,
                Box::new(move |_key, _value| {
                    evictions.fetch_add(1, Ordering::Relaxed);
                }),
            )
        });
        store.put(key, value);
    }

    // == Get ==
    /// Looks up a value; a never-written cache always misses.
    pub fn get(&self, key: &str) -> Option<ByteValue> {
        let mut inner = self.lock();
        let found = inner.store.as_mut().and_then(|store| store.get(key).cloned());
        match found {
            Some(_) => inner.stats.record_hit(),
            None => inner.stats.record_miss(),
        }
        found
    }

    // == Stats ==
    /// Returns a snapshot of the counters and occupancy.
    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        let mut stats = inner.stats.clone();
        stats.evictions = self.evictions.load(Ordering::Relaxed);
        stats.max_bytes = self.cache_bytes;
        if let Some(store) = inner.store.as_ref() {
            stats.total_entries = store.len();
            stats.current_bytes = store.current_bytes();
        }
        stats
    }

    /// Byte budget captured at construction.
    pub fn cache_bytes(&self) -> usize {
        self.cache_bytes
    }

    /// Returns true until the first write builds the store.
    pub fn is_uninitialized(&self) -> bool {
        self.lock().store.is_none()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // The store is left consistent between statements, so a poisoned
        // guard is still usable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
