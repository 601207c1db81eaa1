//! The ordered timestamp queues (component C4).
//!
//! spec.md §9 allows either an intrusive linked list or "an ordered balanced
//! tree keyed on timestamp, value = non-owning transaction handle"; this is
//! the latter. A `BTreeMap<(Timestamp8, u64), Arc<Transaction>>` gives the
//! required ascending order, O(1) access to the front, and O(log n)
//! insert/remove, with the `u64` sequence number breaking ties between
//! transactions that publish the same timestamp in insertion order.

use crate::timestamp::Timestamp8;
use crate::transaction::{QueueKey, Transaction};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Default)]
pub(crate) struct TimestampQueue {
    entries: RwLock<BTreeMap<(Timestamp8, u64), Arc<Transaction>>>,
    next_seq: AtomicU64,
}

impl TimestampQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Insert `txn` keyed by `ts`, returning the key it was filed under.
    pub(crate) fn insert(&self, ts: Timestamp8, txn: Arc<Transaction>) -> QueueKey {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let mut entries = self.entries.write();
        entries.insert((ts, seq), txn);
        QueueKey { ts, seq }
    }

    /// Remove the entry previously returned by [`Self::insert`]. A no-op if
    /// the key is not present (defensive; callers are expected to pass a
    /// live key).
    pub(crate) fn remove(&self, key: QueueKey) {
        let mut entries = self.entries.write();
        entries.remove(&(key.ts, key.seq));
    }

    /// The transaction with the smallest key, if any.
    pub(crate) fn front(&self) -> Option<Arc<Transaction>> {
        let entries = self.entries.read();
        entries.values().next().cloned()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Test/debug helper: the keys in ascending order, to assert the
    /// sorted-queue invariant (spec.md §8, invariant 2).
    #[cfg(test)]
    pub(crate) fn ordered_keys(&self) -> Vec<Timestamp8> {
        self.entries.read().keys().map(|(ts, _)| *ts).collect()
    }
}
