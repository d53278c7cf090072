//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the bounded store against a simple reference model.

use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::cache::{entry_size, BoundedStore};

// == Strategies ==
/// Small key space so that overwrites and hits are frequent
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-h]{1,3}".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,24}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum StoreOp {
    Put { key: String, value: String },
    Get { key: String },
}

fn store_op_strategy() -> impl Strategy<Value = StoreOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| StoreOp::Put { key, value }),
        key_strategy().prop_map(|key| StoreOp::Get { key }),
    ]
}

// == Reference Model ==
/// Recency list as a plain vector, most recent first.
#[derive(Default)]
struct Model {
    max_bytes: usize,
    order: Vec<(String, String)>,
    evicted: Vec<String>,
}

impl Model {
    fn bytes(&self) -> usize {
        self.order.iter().map(|(k, v)| entry_size(k, v)).sum()
    }

    fn touch(&mut self, key: &str) -> Option<(String, String)> {
        let pos = self.order.iter().position(|(k, _)| k == key)?;
        Some(self.order.remove(pos))
    }

    fn put(&mut self, key: String, value: String) {
        self.touch(&key);
        self.order.insert(0, (key, value));
        while self.max_bytes != 0 && self.bytes() > self.max_bytes {
            if let Some((k, _)) = self.order.pop() {
                self.evicted.push(k);
            }
        }
    }

    fn get(&mut self, key: &str) -> Option<String> {
        let entry = self.touch(key)?;
        let value = entry.1.clone();
        self.order.insert(0, entry);
        Some(value)
    }
}

fn recording_store(max_bytes: usize) -> (BoundedStore<String>, Arc<Mutex<Vec<String>>>) {
    let evicted = Arc::new(Mutex::new(Vec::new()));
    let sink = evicted.clone();
    let store = BoundedStore::with_observer(
        max_bytes,
        Box::new(move |key, _| sink.lock().unwrap().push(key)),
    );
    (store, evicted)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Budget and accounting: after every operation the charged bytes equal the
    // sum of live entry sizes and never exceed the budget.
    #[test]
    fn prop_budget_and_accounting(
        max_bytes in 1usize..64,
        ops in prop::collection::vec(store_op_strategy(), 1..80)
    ) {
        let mut store = BoundedStore::new(max_bytes);
        let mut last_value: HashMap<String, String> = HashMap::new();

        for op in ops {
            match op {
                StoreOp::Put { key, value } => {
                    last_value.insert(key.clone(), value.clone());
                    store.put(key, value);
                }
                StoreOp::Get { key } => {
                    store.get(&key);
                }
            }

            let live: usize = store
                .keys()
                .map(|k| entry_size(k, &last_value[k]))
                .sum();
            prop_assert!(store.current_bytes() <= max_bytes);
            prop_assert_eq!(store.current_bytes(), live);
        }
    }

    // Lookups on present keys never change accounting and promote the key.
    #[test]
    fn prop_get_promotes_without_charging(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..20),
        pick in any::<prop::sample::Index>()
    ) {
        let mut store = BoundedStore::new(0);
        for (key, value) in entries {
            store.put(key, value);
        }

        let keys: Vec<String> = store.keys().map(str::to_string).collect();
        let key = pick.get(&keys).clone();
        let before = store.current_bytes();

        prop_assert!(store.get(&key).is_some());
        prop_assert_eq!(store.current_bytes(), before);
        prop_assert_eq!(store.keys().next(), Some(key.as_str()));
    }

    // The store behaves exactly like the reference model: same recency order,
    // same values and the same eviction sequence.
    #[test]
    fn prop_matches_lru_model(
        max_bytes in 0usize..48,
        ops in prop::collection::vec(store_op_strategy(), 1..100)
    ) {
        let (mut store, evicted) = recording_store(max_bytes);
        let mut model = Model { max_bytes, ..Model::default() };

        for op in ops {
            match op {
                StoreOp::Put { key, value } => {
                    store.put(key.clone(), value.clone());
                    model.put(key, value);
                }
                StoreOp::Get { key } => {
                    let got = store.get(&key).cloned();
                    prop_assert_eq!(got, model.get(&key));
                }
            }

            let store_keys: Vec<&str> = store.keys().collect();
            let model_keys: Vec<&str> = model.order.iter().map(|(k, _)| k.as_str()).collect();
            prop_assert_eq!(store_keys, model_keys);
            prop_assert_eq!(store.current_bytes(), model.bytes());
        }

        prop_assert_eq!(&*evicted.lock().unwrap(), &model.evicted);
    }

    // Filling past the budget with fresh keys evicts them in insertion order.
    #[test]
    fn prop_fresh_inserts_evict_oldest_first(count in 2usize..40, max_bytes in 8usize..64) {
        let (mut store, evicted) = recording_store(max_bytes);
        let keys: Vec<String> = (0..count).map(|i| format!("k{:02}", i)).collect();
        for key in &keys {
            store.put(key.clone(), "vvvv".to_string());
        }

        let evicted = evicted.lock().unwrap();
        prop_assert_eq!(&keys[..evicted.len()], &evicted[..]);
        prop_assert_eq!(evicted.len() + store.len(), count);
    }
}
