//! Bounded Store Module
//!
//! Byte-budgeted key/value storage with least-recently-used eviction.

use std::collections::HashMap;
use std::fmt;

use crate::cache::{entry_size, ByteSize, CacheEntry, RecencyList, SlotId};

/// Callback invoked with every entry the store evicts.
///
/// It runs inline, on the caller's thread, while the store is mutably
/// borrowed, so it cannot reach back into the store.
pub type EvictionObserver<V> = Box<dyn FnMut(String, V) + Send>;

// == Bounded Store ==
/// Single-keyspace store holding at most `max_bytes` of keys plus values.
///
/// A budget of `0` means unbounded: nothing is ever evicted.
pub struct BoundedStore<V> {
    /// Byte budget, fixed at construction
    max_bytes: usize,
    /// Sum of the sizes of all live entries
    current_bytes: usize,
    /// Entries ordered from most to least recently used
    order: RecencyList<CacheEntry<V>>,
    /// Key to position in `order`
    index: HashMap<String, SlotId>,
    /// Optional eviction observer
    on_evicted: Option<EvictionObserver<V>>,
}

impl<V: ByteSize> BoundedStore<V> {
    // == Constructor ==
    /// Creates an empty store with the given byte budget.
    ///
    /// # Arguments
    /// * `max_bytes` - Byte budget for keys plus values (`0` = unbounded)
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            current_bytes: 0,
            order: RecencyList::new(),
            index: HashMap::new(),
            on_evicted: None,
        }
    }

    /// Creates an empty store that reports evictions to `observer`.
    pub fn with_observer(max_bytes: usize, observer: EvictionObserver<V>) -> Self {
        let mut store = Self::new(max_bytes);
        store.on_evicted = Some(observer);
        store
    }

    // == Get ==
    /// Looks up a key and marks it most recently used on a hit.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.order.move_to_front(id);
        self.order.get(id).map(|entry| &entry.value)
    }

    // == Put ==
    /// Inserts or replaces a value, then evicts until the budget holds again.
    ///
    /// A replaced key keeps its slot, moves to the front and is charged only
    /// the difference in value size. A new key is charged its full size.
    pub fn put(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.index.get(&key) {
            Some(&id) => {
                self.order.move_to_front(id);
                if let Some(entry) = self.order.get_mut(id) {
                    self.current_bytes = self.current_bytes - entry.value.byte_len()
                        + value.byte_len();
                    entry.value = value;
                }
            }
            None => {
                self.current_bytes += entry_size(&key, &value);
                let id = self.order.push_front(CacheEntry::new(key.clone(), value));
                self.index.insert(key, id);
            }
        }

        while self.max_bytes != 0 && self.current_bytes > self.max_bytes {
            if !self.remove_oldest() {
                break;
            }
        }
    }

    // == Remove Oldest ==
    /// Evicts the least recently used entry.
    ///
    /// Returns false when the store is empty.
    pub fn remove_oldest(&mut self) -> bool {
        let Some(entry) = self.order.pop_back() else {
            return false;
        };
        self.index.remove(&entry.key);
        self.current_bytes -= entry.size();
        if let Some(observer) = self.on_evicted.as_mut() {
            observer(entry.key, entry.value);
        }
        true
    }

    // == Accessors ==
    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Bytes currently charged against the budget.
    pub fn current_bytes(&self) -> usize {
        self.current_bytes
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|entry| entry.key.as_str())
    }
}

impl<V> fmt::Debug for BoundedStore<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedStore")
            .field("max_bytes", &self.max_bytes)
            .field("current_bytes", &self.current_bytes)
            .field("len", &self.index.len())
            .field("observer", &self.on_evicted.is_some())
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording_store(max_bytes: usize) -> (BoundedStore<String>, Arc<Mutex<Vec<String>>>) {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let sink = evicted.clone();
        let store = BoundedStore::with_observer(
            max_bytes,
            Box::new(move |key, _value| sink.lock().unwrap().push(key)),
        );
        (store, evicted)
    }

    #[test]
    fn test_store_new() {
        let store: BoundedStore<String> = BoundedStore::new(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.current_bytes(), 0);
        assert_eq!(store.max_bytes(), 100);
    }

    #[test]
    fn test_store_put_and_get() {
        let mut store = BoundedStore::new(0);
        store.put("key1", "1234".to_string());

        assert_eq!(store.get("key1"), Some(&"1234".to_string()));
        assert_eq!(store.current_bytes(), 8);
        assert!(store.get("key2").is_none());
    }

    #[test]
    fn test_store_evicts_first_entry_when_budget_exceeded() {
        let mut store = BoundedStore::new(10);
        store.put("ab", vec![0u8; 4]);
        store.put("c", vec![0u8; 5]);

        assert_eq!(store.len(), 1);
        assert!(!store.contains("ab"));
        assert!(store.contains("c"));
        assert_eq!(store.current_bytes(), 6);
    }

    #[test]
    fn test_store_accumulates_new_entries() {
        let mut store = BoundedStore::new(100);
        store.put("k1", "v1".to_string());
        store.put("k2", "v2".to_string());
        store.put("k3", "v3".to_string());

        assert_eq!(store.current_bytes(), 12);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_store_overwrite_charges_delta() {
        let mut store = BoundedStore::new(0);
        store.put("key", "short".to_string());
        store.put("key", "much longer".to_string());

        assert_eq!(store.len(), 1);
        assert_eq!(store.current_bytes(), 3 + 11);
        assert_eq!(store.get("key"), Some(&"much longer".to_string()));

        store.put("key", "x".to_string());
        assert_eq!(store.current_bytes(), 4);
    }

    #[test]
    fn test_store_overwrite_promotes() {
        let mut store = BoundedStore::new(12);
        store.put("k1", "1111".to_string());
        store.put("k2", "2222".to_string());

        // k1 becomes most recent, so k2 is the one to go
        store.put("k1", "aaaa".to_string());
        store.put("k3", "3333".to_string());

        assert!(store.contains("k1"));
        assert!(!store.contains("k2"));
        assert!(store.contains("k3"));
    }

    #[test]
    fn test_store_get_promotes_without_changing_bytes() {
        let mut store = BoundedStore::new(18);
        store.put("key1", "aa".to_string());
        store.put("key2", "bb".to_string());
        store.put("key3", "cc".to_string());
        let before = store.current_bytes();

        store.get("key1");
        assert_eq!(store.current_bytes(), before);
        assert_eq!(store.keys().next(), Some("key1"));

        store.put("key4", "dd".to_string());
        assert!(store.contains("key1"));
        assert!(!store.contains("key2"));
    }

    #[test]
    fn test_store_eviction_observer() {
        let (mut store, evicted) = recording_store(10);
        store.put("key1", "123456".to_string());
        store.put("k2", "k2".to_string());
        store.put("k3", "k3".to_string());
        store.put("k4", "k4".to_string());

        assert_eq!(*evicted.lock().unwrap(), vec!["key1".to_string(), "k2".to_string()]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_store_zero_budget_never_evicts() {
        let (mut store, evicted) = recording_store(0);
        for i in 0..1_000 {
            store.put(format!("key{}", i), "x".repeat(64));
        }

        assert_eq!(store.len(), 1_000);
        assert!(evicted.lock().unwrap().is_empty());
    }

    #[test]
    fn test_store_oversized_entry_is_dropped() {
        let (mut store, evicted) = recording_store(8);
        store.put("a", "b".to_string());
        store.put("huge", "0123456789".to_string());

        assert!(store.is_empty());
        assert_eq!(store.current_bytes(), 0);
        assert_eq!(*evicted.lock().unwrap(), vec!["a".to_string(), "huge".to_string()]);
    }

    #[test]
    fn test_store_remove_oldest_empty() {
        let mut store: BoundedStore<String> = BoundedStore::new(10);
        assert!(!store.remove_oldest());
    }

    #[test]
    fn test_store_keys_recency_order() {
        let mut store = BoundedStore::new(0);
        store.put("a", String::new());
        store.put("b", String::new());
        store.put("c", String::new());
        store.get("a");

        let keys: Vec<&str> = store.keys().collect();
        assert_eq!(keys, vec!["a", "c", "b"]);
    }
}
