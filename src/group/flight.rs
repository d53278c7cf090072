//! Single-Flight Module
//!
//! Collapses concurrent loads of the same key into one.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::OnceCell;

// == Single Flight ==
/// Table of in-progress calls keyed by cache key.
///
/// The first caller for a key runs the work; callers arriving while it runs
/// wait and receive a clone of the same outcome. The entry is dropped once
/// the work completes or once every caller waiting on it has gone away, so a
/// later call runs it again.
#[derive(Debug)]
pub struct SingleFlight<T> {
    calls: Mutex<HashMap<String, Call<T>>>,
}

#[derive(Debug)]
struct Call<T> {
    cell: Arc<OnceCell<T>>,
    /// Callers currently awaiting `cell`
    waiters: usize,
}

impl<T: Clone> SingleFlight<T> {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
        }
    }

    // == Run ==
    /// Runs `work` for `key` unless a call for that key is already in flight.
    ///
    /// If the caller running the work is cancelled, one of the waiters takes
    /// over. If every caller is cancelled, the entry is removed.
    pub async fn run<F, Fut>(&self, key: &str, work: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let cell = {
            let mut calls = self.lock();
            let call = calls.entry(key.to_string()).or_insert_with(|| Call {
                cell: Arc::new(OnceCell::new()),
                waiters: 0,
            });
            call.waiters += 1;
            call.cell.clone()
        };
        let _waiting = Waiting {
            flight: self,
            key,
            cell: &cell,
        };

        let outcome = cell.get_or_init(work).await.clone();
        outcome
    }

    /// Number of keys with a call in flight.
    pub fn in_flight(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Call<T>>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> Default for SingleFlight<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Leaves the call on drop, whether the caller finished or was cancelled.
struct Waiting<'a, T: Clone> {
    flight: &'a SingleFlight<T>,
    key: &'a str,
    cell: &'a Arc<OnceCell<T>>,
}

impl<T: Clone> Drop for Waiting<'_, T> {
    fn drop(&mut self) {
        let mut calls = self.flight.lock();
        // A finished entry may already have been replaced by a newer call.
        let Some(call) = calls
            .get_mut(self.key)
            .filter(|call| Arc::ptr_eq(&call.cell, self.cell))
        else {
            return;
        };
        call.waiters -= 1;
        if call.waiters == 0 || call.cell.initialized() {
            calls.remove(self.key);
        }
    }
}
