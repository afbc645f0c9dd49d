//! Per-pair write serialization
//!
//! Reactions between the same two users take a shared async mutex keyed by the
//! unordered pair. Entries are dropped from the table as soon as nobody holds or
//! waits on them.

use dashmap::DashMap;
use spark_core::PairKey;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub struct PairLocks {
    locks: DashMap<PairKey, Arc<Mutex<()>>>,
}

impl PairLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `pair`
    pub async fn lock(&self, pair: PairKey) -> PairGuard<'_> {
        let mutex = Arc::clone(self.locks.entry(pair).or_default().value());
        let guard = mutex.lock_owned().await;
        PairGuard {
            locks: self,
            pair,
            guard: Some(guard),
        }
    }

    /// Number of pairs currently locked or contended
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Held for the duration of a pair's critical section
#[derive(Debug)]
pub struct PairGuard<'a> {
    locks: &'a PairLocks,
    pair: PairKey,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for PairGuard<'_> {
    fn drop(&mut self) {
        // Release first so the table's reference is the only one left when idle
        drop(self.guard.take());
        self.locks
            .locks
            .remove_if(&self.pair, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
