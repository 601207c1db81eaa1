//! The per-transaction record the coordinator tracks.
//!
//! The transaction is owned by its session; the coordinator only ever holds
//! a cheap `Arc` clone while the transaction is published in one of its
//! ordered queues (spec.md §3, "Transaction Record").

use crate::timestamp::Timestamp8;
use parking_lot::Mutex;
use std::sync::Arc;

/// Typed stand-in for the `{commit_timestamp: hex}` config string that
/// `set_transaction_timestamp` takes; the CLI boundary parses into this
/// before calling [`crate::coordinator::TimestampCoordinator::set_transaction_commit_timestamp`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionTimestampConfig {
    pub commit: Option<Timestamp8>,
}

/// Lifecycle state of a transaction, as seen by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Running,
    Committed,
    Aborted,
}

/// The queue key a transaction is filed under, so the queue can remove it
/// again without a linear scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct QueueKey {
    pub(crate) ts: Timestamp8,
    pub(crate) seq: u64,
}

/// Status flags from spec.md §3: whether a timestamp has ever been set
/// (`has_ts_*`), and whether it is currently published to its queue
/// (`public_ts_*`).
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct TxnFlags {
    pub(crate) has_ts_commit: bool,
    pub(crate) has_ts_read: bool,
    pub(crate) public_ts_commit: bool,
    pub(crate) public_ts_read: bool,
}

#[derive(Debug)]
pub(crate) struct TransactionInner {
    pub(crate) commit_timestamp: Timestamp8,
    pub(crate) first_commit_timestamp: Timestamp8,
    pub(crate) read_timestamp: Timestamp8,
    pub(crate) flags: TxnFlags,
    pub(crate) commit_key: Option<QueueKey>,
    pub(crate) read_key: Option<QueueKey>,
    pub(crate) state: TransactionState,
}

impl Default for TransactionInner {
    fn default() -> Self {
        TransactionInner {
            commit_timestamp: Timestamp8::ZERO,
            first_commit_timestamp: Timestamp8::ZERO,
            read_timestamp: Timestamp8::ZERO,
            flags: TxnFlags::default(),
            commit_key: None,
            read_key: None,
            state: TransactionState::Running,
        }
    }
}

/// An MVCC transaction, as tracked by the timestamp coordinator.
///
/// Interior mutability is a `parking_lot::Mutex` guarding this transaction's
/// own fields; it is private to the transaction and is not one of the three
/// global locks described in spec.md §5.
pub struct Transaction {
    pub(crate) inner: Mutex<TransactionInner>,
}

impl Transaction {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Transaction {
            inner: Mutex::new(TransactionInner::default()),
        })
    }

    pub fn state(&self) -> TransactionState {
        self.inner.lock().state
    }

    pub fn is_running(&self) -> bool {
        self.state() == TransactionState::Running
    }

    pub fn commit_timestamp(&self) -> Timestamp8 {
        self.inner.lock().commit_timestamp
    }

    pub fn first_commit_timestamp(&self) -> Timestamp8 {
        self.inner.lock().first_commit_timestamp
    }

    pub fn read_timestamp(&self) -> Timestamp8 {
        self.inner.lock().read_timestamp
    }

    pub fn has_commit_timestamp(&self) -> bool {
        self.inner.lock().flags.has_ts_commit
    }

    pub fn has_read_timestamp(&self) -> bool {
        self.inner.lock().flags.has_ts_read
    }

    pub fn is_commit_timestamp_public(&self) -> bool {
        self.inner.lock().flags.public_ts_commit
    }

    pub fn is_read_timestamp_public(&self) -> bool {
        self.inner.lock().flags.public_ts_read
    }
}

impl std::fmt::Debug for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Transaction")
            .field("state", &inner.state)
            .field("commit_timestamp", &inner.commit_timestamp)
            .field("first_commit_timestamp", &inner.first_commit_timestamp)
            .field("read_timestamp", &inner.read_timestamp)
            .finish()
    }
}
