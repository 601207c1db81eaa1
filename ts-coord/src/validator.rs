//! The validator (component C2): checks a candidate timestamp against the
//! registry and the current transaction's first commit timestamp.

use crate::error::{invalid, CResult};
use crate::registry::Registry;
use crate::timestamp::Timestamp8;
use crate::transaction::Transaction;

/// Which comparisons [`validate`] should perform, per spec.md §4.2.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateAgainst {
    pub cmp_oldest: bool,
    pub cmp_stable: bool,
    pub cmp_commit: bool,
}

impl ValidateAgainst {
    pub const ALL: Self = ValidateAgainst {
        cmp_oldest: true,
        cmp_stable: true,
        cmp_commit: true,
    };

    pub const OLDEST_ONLY: Self = ValidateAgainst {
        cmp_oldest: true,
        cmp_stable: false,
        cmp_commit: false,
    };
}

/// Reject `ts` if it is older than the oldest/stable timestamps the caller
/// asked to compare against, or older than `txn`'s first commit timestamp.
/// Reads are taken under a shared hold of `rw_main`.
pub(crate) fn validate(
    name: &str,
    ts: Timestamp8,
    against: ValidateAgainst,
    registry: &Registry,
    txn: &Transaction,
) -> CResult<()> {
    let (older_than_oldest, older_than_stable) = registry.with_read(|reg| {
        let older_than_oldest = against.cmp_oldest && reg.has_oldest && ts < reg.oldest_ts;
        let older_than_stable = against.cmp_stable && reg.has_stable && ts < reg.stable_ts;
        (older_than_oldest, older_than_stable)
    });

    if older_than_oldest {
        return Err(invalid(format!(
            "{name} timestamp {ts} older than oldest timestamp"
        )));
    }
    if older_than_stable {
        return Err(invalid(format!(
            "{name} timestamp {ts} older than stable timestamp"
        )));
    }

    if against.cmp_commit && txn.has_commit_timestamp() {
        let first_commit = txn.first_commit_timestamp();
        if ts < first_commit {
            return Err(invalid(format!(
                "{name} timestamp {ts} older than the first commit timestamp {first_commit} for this transaction"
            )));
        }
    }

    Ok(())
}
