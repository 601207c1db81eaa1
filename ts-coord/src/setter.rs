//! The global setter (component C6): `set_timestamp(config)`.

use crate::error::{invalid, CResult};
use crate::pinned::recompute_pinned;
use crate::queue::TimestampQueue;
use crate::registry::Registry;
use crate::timestamp::Timestamp8;

/// The fields accepted by `set_timestamp`. Each is `None` when the caller
/// did not supply that component of the config string.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetTimestampConfig {
    pub commit: Option<Timestamp8>,
    pub oldest: Option<Timestamp8>,
    pub stable: Option<Timestamp8>,
    /// Bypass the ordering checks against the other two timestamps.
    pub force: bool,
}

/// Apply `config` to the registry, per spec.md §4.6:
///
/// 1. Parse already happened (the caller hands us [`Timestamp8`] values).
/// 2. If no component was supplied, return success without touching
///    `rw_main` at all.
/// 3. Unless `force`, reject `oldest > stable` and `commit < oldest`.
/// 4. Drop any component that would not move its timestamp forward
///    (a same-or-earlier value is a silent no-op for that component, not
///    an error).
/// 5. Apply the surviving components under the exclusive `rw_main` lock.
/// 6. Trigger a pinned-timestamp recompute if `oldest` advanced.
pub(crate) fn set_global(
    registry: &Registry,
    read_q: &TimestampQueue,
    config: SetTimestampConfig,
) -> CResult<()> {
    if config.commit.is_none() && config.oldest.is_none() && config.stable.is_none() {
        return Ok(());
    }

    if !config.force {
        check_ordering(registry, &config)?;
    }

    let (oldest_applied, stable_applied) = registry.with_write(|r| {
        let mut oldest_applied = false;
        let mut stable_applied = false;

        if let Some(commit) = config.commit {
            if config.force || !r.has_commit || commit > r.commit_ts {
                r.commit_ts = commit;
                r.has_commit = true;
            }
        }

        if let Some(oldest) = config.oldest {
            if config.force || !r.has_oldest || oldest > r.oldest_ts {
                r.oldest_ts = oldest;
                r.has_oldest = true;
                r.oldest_is_pinned = false;
                oldest_applied = true;
            }
        }

        if let Some(stable) = config.stable {
            if config.force || !r.has_stable || stable > r.stable_ts {
                r.stable_ts = stable;
                r.has_stable = true;
                r.stable_is_pinned = false;
                stable_applied = true;
            }
        }

        (oldest_applied, stable_applied)
    });

    if oldest_applied || stable_applied {
        recompute_pinned(registry, read_q, config.force)?;
    }

    Ok(())
}

fn check_ordering(registry: &Registry, config: &SetTimestampConfig) -> CResult<()> {
    registry.with_read(|r| {
        let oldest = config.oldest.unwrap_or(r.oldest_ts);
        let has_oldest = config.oldest.is_some() || r.has_oldest;
        let stable = config.stable.unwrap_or(r.stable_ts);
        let has_stable = config.stable.is_some() || r.has_stable;

        if config.commit.is_some() {
            let commit = config.commit.unwrap();
            if has_oldest && commit < oldest {
                return Err(invalid(format!(
                    "commit timestamp {commit} must not be earlier than oldest timestamp {oldest}"
                )));
            }
            if has_stable && commit < stable {
                return Err(invalid(format!(
                    "commit timestamp {commit} must not be earlier than stable timestamp {stable}"
                )));
            }
        }

        if (config.oldest.is_some() || config.stable.is_some()) && has_oldest && has_stable && oldest > stable {
            return Err(invalid(format!(
                "oldest timestamp {oldest} must not be later than stable timestamp {stable}"
            )));
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp8 {
        Timestamp8::from_hex("t", s).unwrap()
    }

    #[test]
    fn sets_each_supplied_component() {
        let registry = Registry::new();
        let read_q = TimestampQueue::new();
        set_global(
            &registry,
            &read_q,
            SetTimestampConfig {
                oldest: Some(ts("2")),
                stable: Some(ts("5")),
                ..Default::default()
            },
        )
        .unwrap();

        let snap = registry.snapshot();
        assert_eq!(snap.oldest_ts, ts("2"));
        assert_eq!(snap.stable_ts, ts("5"));
    }

    #[test]
    fn rejects_oldest_past_stable_without_force() {
        let registry = Registry::new();
        let read_q = TimestampQueue::new();
        registry.with_write(|r| {
            r.stable_ts = ts("3");
            r.has_stable = true;
        });

        let err = set_global(
            &registry,
            &read_q,
            SetTimestampConfig {
                oldest: Some(ts("5")),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("must not be later than stable"));
    }

    #[test]
    fn force_bypasses_ordering_checks() {
        let registry = Registry::new();
        let read_q = TimestampQueue::new();
        registry.with_write(|r| {
            r.stable_ts = ts("3");
            r.has_stable = true;
        });

        set_global(
            &registry,
            &read_q,
            SetTimestampConfig {
                oldest: Some(ts("5")),
                force: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(registry.snapshot().oldest_ts, ts("5"));
    }

    #[test]
    fn non_advancing_value_is_a_silent_no_op() {
        let registry = Registry::new();
        let read_q = TimestampQueue::new();
        registry.with_write(|r| {
            r.oldest_ts = ts("5");
            r.has_oldest = true;
        });

        set_global(
            &registry,
            &read_q,
            SetTimestampConfig {
                oldest: Some(ts("2")),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(registry.snapshot().oldest_ts, ts("5"));
    }

    #[test]
    fn empty_config_returns_ok_without_touching_the_registry() {
        let registry = Registry::new();
        let read_q = TimestampQueue::new();
        registry.with_write(|r| {
            r.oldest_ts = ts("5");
            r.has_oldest = true;
        });

        set_global(&registry, &read_q, SetTimestampConfig::default()).unwrap();

        let snap = registry.snapshot();
        assert_eq!(snap.oldest_ts, ts("5"));
        assert!(!snap.has_stable);
        assert!(!snap.has_commit);
    }

    #[test]
    fn advancing_oldest_triggers_pinned_recompute() {
        let registry = Registry::new();
        let read_q = TimestampQueue::new();
        set_global(
            &registry,
            &read_q,
            SetTimestampConfig {
                oldest: Some(ts("5")),
                ..Default::default()
            },
        )
        .unwrap();

        let snap = registry.snapshot();
        assert!(snap.has_pinned);
        assert_eq!(snap.pinned_ts, ts("5"));
    }
}
