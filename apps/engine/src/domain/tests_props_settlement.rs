//! Property tests for settlement: the zero-sum oracle under arbitrary
//! normalized allocations.

use std::collections::BTreeMap;

use proptest::prelude::*;

use crate::domain::allocation::{normalize_shares, Allocation};
use crate::domain::settlement::settle;
use crate::domain::state::SeatId;
use crate::domain::test_prelude;

fn seats_strategy() -> impl Strategy<Value = Vec<SeatId>> {
    proptest::collection::btree_set(0u8..16, 2..=8).prop_map(|s| s.into_iter().collect())
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Any allocation over the settled seats settles with dust bounded by
    /// one unit per seat, and nobody is paid from thin air.
    #[test]
    fn prop_settlement_is_zero_sum_within_tolerance(
        (seats, weights) in seats_strategy()
            .prop_flat_map(|s| {
                let n = s.len();
                (Just(s), proptest::collection::vec(0u32..100, n))
            }),
        entry_fee in 1i64..10_000,
    ) {
        let raw: BTreeMap<SeatId, u32> = seats.iter().copied().zip(weights).collect();
        let keep = seats[0];
        let shares = normalize_shares(&raw, keep).shares;
        let (allocation, _) = Allocation::normalized(&shares, keep);

        let s = settle(&seats, &allocation, entry_fee)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        prop_assert_eq!(s.pool, seats.len() as i64 * entry_fee);
        prop_assert!(s.net.abs() <= seats.len() as i64,
            "net {} exceeds tolerance {}", s.net, seats.len());

        let paid: i64 = s.payouts.values().sum();
        prop_assert!(paid <= s.pool, "paid {paid} out of pool {}", s.pool);

        for (&seat, &profit) in &s.profits {
            prop_assert_eq!(profit, s.payouts[&seat] - entry_fee);
            prop_assert!(profit >= -entry_fee, "seat {seat} lost more than its stake");
        }
    }

    /// A winner-takes-all allocation settles with no dust at all.
    #[test]
    fn prop_winner_takes_all_is_exact(
        seats in seats_strategy(),
        winner_idx in any::<prop::sample::Index>(),
        entry_fee in 1i64..10_000,
    ) {
        let winner = seats[winner_idx.index(seats.len())];
        let allocation = Allocation::self_take_all(winner);

        let s = settle(&seats, &allocation, entry_fee)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        prop_assert_eq!(s.net, 0);
        prop_assert_eq!(s.payouts[&winner], s.pool);
        prop_assert_eq!(s.profits[&winner], s.pool - entry_fee);
    }
}
