//! The top-level engine handle: wires the registry, the two ordered
//! queues, and the checkpoint hook together behind the public API.

use std::sync::Arc;

use crate::error::{invalid, not_supported, CResult};
use crate::pinned::recompute_pinned;
use crate::query::{query, QueryTimestampSelector};
use crate::queue::TimestampQueue;
use crate::registry::Registry;
use crate::setter::{set_global, SetTimestampConfig};
use crate::timestamp::Timestamp8;
use crate::transaction::{Transaction, TransactionState, TransactionTimestampConfig};
use crate::validator::{validate, ValidateAgainst};

/// The global timestamp coordinator.
///
/// Owns the registry (`rw_main`) and the two ordered timestamp queues
/// (`rw_commit_q`, `rw_read_q`) described in spec.md §5. Transactions are
/// tracked by `Arc` and may be shared freely with their owning session;
/// the coordinator only ever clones the `Arc`, never the transaction
/// itself.
pub struct TimestampCoordinator {
    registry: Registry,
    commit_q: TimestampQueue,
    read_q: TimestampQueue,
    enabled: bool,
}

impl Default for TimestampCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl TimestampCoordinator {
    /// A coordinator with timestamps enabled, matching the common build
    /// configuration.
    pub fn new() -> Self {
        TimestampCoordinator {
            registry: Registry::new(),
            commit_q: TimestampQueue::new(),
            read_q: TimestampQueue::new(),
            enabled: true,
        }
    }

    /// Construct a coordinator with timestamps switched off at runtime,
    /// the equivalent of a build without `HAVE_TIMESTAMPS`. Every call
    /// other than [`Self::new`]/[`Self::begin_transaction`] fails with
    /// [`crate::error::Error::NotSupported`].
    pub fn disabled() -> Self {
        TimestampCoordinator {
            enabled: false,
            ..Self::new()
        }
    }

    fn ensure_enabled(&self) -> CResult<()> {
        if self.enabled {
            Ok(())
        } else {
            Err(not_supported("timestamps are not enabled for this engine"))
        }
    }

    /// Start a new transaction. Always succeeds, even if timestamps are
    /// disabled; a transaction only touches the coordinator once it sets
    /// a timestamp.
    pub fn begin_transaction(&self) -> Arc<Transaction> {
        Transaction::new()
    }

    /// `set_timestamp(config)`: apply global timestamp updates.
    pub fn set_timestamp(&self, config: SetTimestampConfig) -> CResult<()> {
        self.ensure_enabled()?;
        set_global(&self.registry, &self.read_q, config)
    }

    /// `query_timestamp(get=selector)`.
    pub fn query_timestamp(&self, selector: QueryTimestampSelector) -> CResult<Timestamp8> {
        self.ensure_enabled()?;
        query(selector, &self.registry, &self.commit_q, &self.read_q)
    }

    /// `timestamp_transaction(commit_timestamp=...)`: publish a commit
    /// timestamp for a running transaction, per spec.md §4.8.
    pub fn set_transaction_commit_timestamp(
        &self,
        txn: &Arc<Transaction>,
        ts: Timestamp8,
    ) -> CResult<()> {
        self.ensure_enabled()?;
        if !txn.is_running() {
            return Err(invalid(
                "cannot set a commit timestamp on a transaction that is not running",
            ));
        }
        validate("commit", ts, ValidateAgainst::ALL, &self.registry, txn)?;
        self.insert_commit(txn, ts);
        log::debug!("transaction commit timestamp set to {ts}");
        Ok(())
    }

    /// `timestamp_transaction(commit_timestamp=?)` taking the typed config
    /// form rather than a bare [`Timestamp8`]; a no-op if `config.commit`
    /// is `None`.
    pub fn set_transaction_timestamp(
        &self,
        txn: &Arc<Transaction>,
        config: TransactionTimestampConfig,
    ) -> CResult<()> {
        match config.commit {
            Some(ts) => self.set_transaction_commit_timestamp(txn, ts),
            None => Ok(()),
        }
    }

    /// `timestamp_transaction(read_timestamp=...)`, per spec.md §4.8.
    /// Only compared against `oldest`, never `stable` or the
    /// transaction's own commit timestamp.
    pub fn set_transaction_read_timestamp(
        &self,
        txn: &Arc<Transaction>,
        ts: Timestamp8,
    ) -> CResult<()> {
        self.ensure_enabled()?;
        if !txn.is_running() {
            return Err(invalid(
                "cannot set a read timestamp on a transaction that is not running",
            ));
        }
        validate("read", ts, ValidateAgainst::OLDEST_ONLY, &self.registry, txn)?;
        self.insert_read(txn, ts);
        Ok(())
    }

    /// Commit `txn`: drop it from both queues, fold its commit timestamp
    /// into the global `commit` timestamp if it advances it, and
    /// recompute `pinned` now that a reader may have left the read queue.
    pub fn commit_transaction(&self, txn: &Arc<Transaction>) -> CResult<()> {
        if !txn.is_running() {
            return Err(invalid("transaction has already finished"));
        }

        let (has_commit, commit_ts) = {
            let inner = txn.inner.lock();
            (inner.flags.has_ts_commit, inner.commit_timestamp)
        };

        self.clear_commit(txn);
        self.clear_read(txn);
        txn.inner.lock().state = TransactionState::Committed;

        if has_commit {
            self.registry.with_write(|r| {
                if !r.has_commit || commit_ts > r.commit_ts {
                    r.commit_ts = commit_ts;
                    r.has_commit = true;
                }
            });
            log::info!("transaction committed at {commit_ts}");
        }

        recompute_pinned(&self.registry, &self.read_q, false)
    }

    /// Abort `txn`: drop it from both queues without touching the global
    /// `commit` timestamp.
    pub fn abort_transaction(&self, txn: &Arc<Transaction>) -> CResult<()> {
        if !txn.is_running() {
            return Err(invalid("transaction has already finished"));
        }

        self.clear_commit(txn);
        self.clear_read(txn);
        txn.inner.lock().state = TransactionState::Aborted;

        recompute_pinned(&self.registry, &self.read_q, false)
    }

    /// Record the read timestamp of the transaction backing the active
    /// checkpoint, so `query_timestamp(get=pinned)` accounts for it.
    pub fn set_checkpoint_read_timestamp(&self, ts: Timestamp8) -> CResult<()> {
        self.ensure_enabled()?;
        self.registry.with_write(|r| r.checkpoint_read_ts = Some(ts));
        recompute_pinned(&self.registry, &self.read_q, false)
    }

    /// Clear the checkpoint's read timestamp once it completes.
    pub fn clear_checkpoint_read_timestamp(&self) -> CResult<()> {
        self.ensure_enabled()?;
        self.registry.with_write(|r| r.checkpoint_read_ts = None);
        recompute_pinned(&self.registry, &self.read_q, false)
    }

    /// Publish `ts` as the transaction's commit timestamp. A transaction
    /// already public in the commit queue keeps its existing queue position
    /// (keyed by `first_commit_timestamp`) even as it raises `ts`: only the
    /// first publish inserts into the queue, per spec.md §4.4.
    fn insert_commit(&self, txn: &Arc<Transaction>, ts: Timestamp8) {
        let mut inner = txn.inner.lock();
        if inner.flags.public_ts_commit {
            inner.commit_timestamp = ts;
            return;
        }

        inner.commit_timestamp = ts;
        if !inner.flags.has_ts_commit {
            inner.first_commit_timestamp = ts;
            inner.flags.has_ts_commit = true;
        }
        drop(inner);

        let key = self.commit_q.insert(ts, txn.clone());
        let mut inner = txn.inner.lock();
        inner.commit_key = Some(key);
        inner.flags.public_ts_commit = true;
    }

    /// Publish `ts` as the transaction's read timestamp. Same no-op-on-queue
    /// rule as [`Self::insert_commit`]: once public, later calls only update
    /// the stored value, never re-key the queue entry.
    fn insert_read(&self, txn: &Arc<Transaction>, ts: Timestamp8) {
        let mut inner = txn.inner.lock();
        if inner.flags.public_ts_read {
            inner.read_timestamp = ts;
            return;
        }

        inner.read_timestamp = ts;
        inner.flags.has_ts_read = true;
        drop(inner);

        let key = self.read_q.insert(ts, txn.clone());
        let mut inner = txn.inner.lock();
        inner.read_key = Some(key);
        inner.flags.public_ts_read = true;
    }

    fn clear_commit(&self, txn: &Arc<Transaction>) {
        let key = txn.inner.lock().commit_key.take();
        if let Some(key) = key {
            self.commit_q.remove(key);
        }
        txn.inner.lock().flags.public_ts_commit = false;
    }

    fn clear_read(&self, txn: &Arc<Transaction>) {
        let key = txn.inner.lock().read_key.take();
        if let Some(key) = key {
            self.read_q.remove(key);
            debug_assert!(
                txn.read_timestamp() >= self.registry.with_read(|r| r.pinned_ts),
                "pinned timestamp advanced past a still-live reader"
            );
        }
        txn.inner.lock().flags.public_ts_read = false;
    }
}
