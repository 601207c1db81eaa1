//! The query engine (component C5): answers `get=<selector>`.

use crate::error::{not_found, CResult};
use crate::queue::TimestampQueue;
use crate::registry::Registry;
use crate::timestamp::Timestamp8;

/// The `get=` selector accepted by `query_timestamp`. Defaults to `Pinned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryTimestampSelector {
    AllCommitted,
    Oldest,
    #[default]
    Pinned,
    Stable,
}

pub(crate) fn query(
    selector: QueryTimestampSelector,
    registry: &Registry,
    commit_q: &TimestampQueue,
    read_q: &TimestampQueue,
) -> CResult<Timestamp8> {
    match selector {
        QueryTimestampSelector::AllCommitted => query_all_committed(registry, commit_q),
        QueryTimestampSelector::Oldest => query_oldest(registry),
        QueryTimestampSelector::Pinned => query_pinned(registry, read_q),
        QueryTimestampSelector::Stable => query_stable(registry),
    }
}

fn query_all_committed(registry: &Registry, commit_q: &TimestampQueue) -> CResult<Timestamp8> {
    let (has_commit, mut ts) = registry.with_read(|r| (r.has_commit, r.commit_ts));
    if !has_commit {
        return Err(not_found("no commit timestamp has been set"));
    }

    if let Some(front) = commit_q.front() {
        let front_ts = front.first_commit_timestamp();
        if front_ts < ts {
            ts = front_ts;
        }
    }
    Ok(ts)
}

fn query_oldest(registry: &Registry) -> CResult<Timestamp8> {
    registry.with_read(|r| {
        if !r.has_oldest {
            return Err(not_found("no oldest timestamp has been set"));
        }
        Ok(r.oldest_ts)
    })
}

fn query_stable(registry: &Registry) -> CResult<Timestamp8> {
    registry.with_read(|r| {
        if !r.has_stable {
            return Err(not_found("no stable timestamp has been set"));
        }
        Ok(r.stable_ts)
    })
}

/// `pinned`: the minimum of `oldest`, the active checkpoint's read
/// timestamp (if any and smaller), and the oldest live ordinary reader.
pub(crate) fn query_pinned(registry: &Registry, read_q: &TimestampQueue) -> CResult<Timestamp8> {
    let mut ts = registry.with_read(|r| {
        if !r.has_oldest {
            return Err(not_found("no oldest timestamp has been set"));
        }
        let mut ts = r.oldest_ts;
        if let Some(checkpoint_ts) = r.checkpoint_read_ts {
            if !checkpoint_ts.is_zero() && checkpoint_ts < ts {
                ts = checkpoint_ts;
            }
        }
        Ok(ts)
    })?;

    if let Some(front) = read_q.front() {
        let reader_ts = front.read_timestamp();
        if reader_ts < ts {
            ts = reader_ts;
        }
    }

    Ok(ts)
}
