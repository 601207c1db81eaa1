//! The pinned-timestamp recomputer (component C7).
//!
//! Runs after any change that could move `pinned` forward: a new `oldest`,
//! or a reader leaving the read queue. Cheap in the common case where
//! `oldest` is already the pin (no transaction is reading behind it).

use crate::query::query_pinned;
use crate::queue::TimestampQueue;
use crate::registry::Registry;

/// Recompute `pinned_ts` per spec.md §4.7.
///
/// 1. If `oldest_is_pinned`, nothing can move `pinned` backward past
///    `oldest`, so there is nothing to do.
/// 2. Otherwise read `oldest_ts` and the current `pinned` query result
///    under a shared hold of `rw_main`, take their minimum as the
///    candidate, and unless `force`, skip the write if it would not
///    advance `pinned_ts`.
/// 3. Re-check under the exclusive lock before writing, since another
///    thread may have already advanced `pinned_ts` past the candidate.
pub(crate) fn recompute_pinned(
    registry: &Registry,
    read_q: &TimestampQueue,
    force: bool,
) -> crate::error::CResult<()> {
    if !force && registry.with_read(|r| r.oldest_is_pinned) {
        return Ok(());
    }

    let oldest_ts = match registry.with_read(|r| {
        if r.has_oldest {
            Some(r.oldest_ts)
        } else {
            None
        }
    }) {
        Some(ts) => ts,
        None => return Ok(()),
    };

    let active_ts = match query_pinned(registry, read_q) {
        Ok(ts) => ts,
        Err(e) if e.is_not_found() => return Ok(()),
        Err(e) => return Err(e),
    };

    let candidate = std::cmp::min(oldest_ts, active_ts);

    if !force && registry.with_read(|r| r.has_pinned && candidate <= r.pinned_ts) {
        return Ok(());
    }

    registry.with_write(|r| {
        let should_write = force || !r.has_pinned || candidate > r.pinned_ts;
        if should_write {
            r.pinned_ts = candidate;
            r.has_pinned = true;
            r.oldest_is_pinned = r.has_oldest && candidate == r.oldest_ts;
        }
    });

    Ok(())
}
