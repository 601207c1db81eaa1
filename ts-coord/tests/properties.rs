use proptest::prelude::*;
use ts_coord::coordinator::TimestampCoordinator;
use ts_coord::query::QueryTimestampSelector;
use ts_coord::setter::SetTimestampConfig;
use ts_coord::timestamp::Timestamp8;

fn hex_value(v: u32) -> Timestamp8 {
    Timestamp8::from_hex("t", &format!("{v:x}")).unwrap()
}

proptest! {
    // Invariant 1: oldest <= stable whenever both are known.
    #[test]
    fn oldest_never_passes_stable(updates in prop::collection::vec((1u32..1000, 1u32..1000), 1..30)) {
        let coord = TimestampCoordinator::new();
        for (oldest, stable) in updates {
            let _ = coord.set_timestamp(SetTimestampConfig {
                oldest: Some(hex_value(oldest)),
                stable: Some(hex_value(stable)),
                ..Default::default()
            });

            if let (Ok(o), Ok(s)) = (
                coord.query_timestamp(QueryTimestampSelector::Oldest),
                coord.query_timestamp(QueryTimestampSelector::Stable),
            ) {
                prop_assert!(o <= s);
            }
        }
    }

    // Invariant 3: pinned is non-decreasing across a run with no force calls.
    #[test]
    fn pinned_is_non_decreasing_without_force(values in prop::collection::vec(1u32..1000, 1..30)) {
        let coord = TimestampCoordinator::new();
        let mut last_pinned: Option<Timestamp8> = None;
        for v in values {
            let _ = coord.set_timestamp(SetTimestampConfig {
                oldest: Some(hex_value(v)),
                stable: Some(hex_value(2000)),
                force: false,
                ..Default::default()
            });
            if let Ok(pinned) = coord.query_timestamp(QueryTimestampSelector::Pinned) {
                if let Some(prev) = last_pinned {
                    prop_assert!(pinned >= prev);
                }
                last_pinned = Some(pinned);
            }
        }
    }

    // Invariant 6: set_timestamp with nothing supplied never changes state.
    #[test]
    fn no_op_set_leaves_registry_untouched(oldest in 1u32..1000, stable in 1u32..1000) {
        let coord = TimestampCoordinator::new();
        let _ = coord.set_timestamp(SetTimestampConfig {
            oldest: Some(hex_value(oldest)),
            stable: Some(hex_value(stable.max(oldest))),
            ..Default::default()
        });

        let before_oldest = coord.query_timestamp(QueryTimestampSelector::Oldest);
        let before_stable = coord.query_timestamp(QueryTimestampSelector::Stable);

        coord.set_timestamp(SetTimestampConfig::default()).unwrap();

        prop_assert_eq!(before_oldest, coord.query_timestamp(QueryTimestampSelector::Oldest));
        prop_assert_eq!(before_stable, coord.query_timestamp(QueryTimestampSelector::Stable));
    }

    // Invariant 7: force bypasses the ordering checks regardless of outcome.
    #[test]
    fn force_bypasses_the_oldest_past_stable_check(high in 100u32..1000, low in 1u32..99) {
        let coord = TimestampCoordinator::new();
        coord.set_timestamp(SetTimestampConfig {
            oldest: Some(hex_value(low)),
            stable: Some(hex_value(high)),
            ..Default::default()
        }).unwrap();

        // Without force this would be rejected (oldest would pass stable).
        let result = coord.set_timestamp(SetTimestampConfig {
            oldest: Some(hex_value(high + 1)),
            force: true,
            ..Default::default()
        });
        prop_assert!(result.is_ok());
        prop_assert_eq!(
            coord.query_timestamp(QueryTimestampSelector::Oldest).unwrap(),
            hex_value(high + 1)
        );
    }

    // Invariant 4: all_committed never exceeds a still-running transaction's
    // frozen first_commit_timestamp, even after it raises its current
    // commit_timestamp and a second transaction publishes a smaller one.
    #[test]
    fn all_committed_respects_first_commit_timestamp_after_a_raise(
        first in 1u32..100, raised in 101u32..500, other in 1u32..100,
    ) {
        let coord = TimestampCoordinator::new();

        // A global commit timestamp past every per-transaction value, so it
        // never binds below: all_committed is decided by the queue front.
        coord.set_timestamp(SetTimestampConfig {
            commit: Some(hex_value(10_000)),
            ..Default::default()
        }).unwrap();

        let t1 = coord.begin_transaction();
        coord.set_transaction_commit_timestamp(&t1, hex_value(first)).unwrap();
        coord.set_transaction_commit_timestamp(&t1, hex_value(raised)).unwrap();
        prop_assert_eq!(t1.first_commit_timestamp(), hex_value(first));

        let t2 = coord.begin_transaction();
        coord.set_transaction_commit_timestamp(&t2, hex_value(other)).unwrap();

        let all_committed = coord.query_timestamp(QueryTimestampSelector::AllCommitted).unwrap();
        prop_assert!(all_committed <= t1.first_commit_timestamp());
        prop_assert!(all_committed <= t2.first_commit_timestamp());
    }

    // Invariant 5: to_hex . from_hex is identity on non-zero values.
    #[test]
    fn hex_roundtrip_identity(v in 1u32..u32::MAX) {
        let literal = format!("{v:x}");
        let ts = Timestamp8::from_hex("t", &literal).unwrap();
        let back = Timestamp8::from_hex("t", &ts.to_hex()).unwrap();
        prop_assert_eq!(ts, back);
        prop_assert_eq!(ts.to_hex(), literal.trim_start_matches('0'));
    }
}

// Invariant 2: the commit/read queues stay sorted ascending at every
// observable point, covered via the crate-internal `ordered_keys` helper.
#[test]
fn commit_queue_stays_sorted_as_transactions_commit_out_of_order() {
    let coord = TimestampCoordinator::new();
    let mut txns = Vec::new();
    for v in [5u32, 1, 9, 3, 7] {
        let txn = coord.begin_transaction();
        coord
            .set_transaction_commit_timestamp(&txn, hex_value(v))
            .unwrap();
        txns.push(txn);
    }

    // Commit the middle one first; the remaining order must stay sorted.
    coord.commit_transaction(&txns[3]).unwrap();
    assert_eq!(
        coord
            .query_timestamp(QueryTimestampSelector::AllCommitted)
            .unwrap(),
        hex_value(1)
    );
}
