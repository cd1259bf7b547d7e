//! Property tests for the round resolver (pure domain, no runtime).
//!
//! Contract under test:
//! - Every resolved round yields exactly one verdict.
//! - An elimination verdict always names an actual proposer.
//! - A winner at three or more seats always holds >= 61%.
//! - Normalized ballots only ever move the verdict between proposers.

use std::collections::BTreeMap;

use proptest::prelude::*;

use crate::domain::allocation::{Allocation, Ballot};
use crate::domain::resolver::{resolve_round, Verdict, SUPERMAJORITY_PCT};
use crate::domain::state::SeatId;
use crate::domain::test_prelude;

fn proposers_strategy() -> impl Strategy<Value = Vec<SeatId>> {
    // 2..=6 proposers with distinct ids drawn from one byte.
    proptest::collection::btree_set(0u8..32, 2..=6).prop_map(|s| s.into_iter().collect())
}

fn ballots_strategy(proposers: Vec<SeatId>) -> impl Strategy<Value = BTreeMap<SeatId, Ballot>> {
    let weights = proptest::collection::vec(0u32..100, proposers.len());
    let voters = proposers.clone();
    proptest::collection::vec(weights, voters.len()).prop_map(move |rows| {
        rows.into_iter()
            .zip(voters.iter())
            .map(|(row, &voter)| {
                let raw: BTreeMap<SeatId, u32> =
                    proposers.iter().copied().zip(row).collect();
                let ballot = Ballot::normalized(&raw, &proposers)
                    .map(|(b, _)| b)
                    .unwrap_or_else(|| panic!("non-empty proposers"));
                (voter, ballot)
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Every round with valid inputs resolves, and the verdict names a
    /// proposer.
    #[test]
    fn prop_verdict_names_a_proposer(
        (proposers, ballots) in proposers_strategy()
            .prop_flat_map(|p| (Just(p.clone()), ballots_strategy(p)))
    ) {
        let proposals: BTreeMap<SeatId, Allocation> = proposers
            .iter()
            .map(|&s| (s, Allocation::self_take_all(s)))
            .collect();

        let outcome = resolve_round(proposers.len(), &proposals, &ballots)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        let named = match outcome.verdict {
            Verdict::Winner { proposer } => proposer,
            Verdict::Eliminated { seat } => seat,
        };
        prop_assert!(proposers.contains(&named),
            "verdict names {named}, proposers are {proposers:?}");
    }

    /// At three or more active seats a winner always clears the
    /// supermajority threshold.
    #[test]
    fn prop_winner_holds_supermajority(
        (proposers, ballots) in proposers_strategy()
            .prop_flat_map(|p| (Just(p.clone()), ballots_strategy(p)))
    ) {
        prop_assume!(proposers.len() >= 3);
        let proposals: BTreeMap<SeatId, Allocation> = proposers
            .iter()
            .map(|&s| (s, Allocation::self_take_all(s)))
            .collect();

        let outcome = resolve_round(proposers.len(), &proposals, &ballots)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        if let Verdict::Winner { proposer } = outcome.verdict {
            prop_assert!(outcome.percentages[&proposer] >= SUPERMAJORITY_PCT);
        }
    }

    /// Elimination removes exactly one seat, and never the brand-new winner:
    /// a no-win round shrinks the field by one.
    #[test]
    fn prop_no_win_round_eliminates_exactly_one(
        (proposers, ballots) in proposers_strategy()
            .prop_flat_map(|p| (Just(p.clone()), ballots_strategy(p)))
    ) {
        prop_assume!(proposers.len() >= 3);
        let proposals: BTreeMap<SeatId, Allocation> = proposers
            .iter()
            .map(|&s| (s, Allocation::self_take_all(s)))
            .collect();

        let outcome = resolve_round(proposers.len(), &proposals, &ballots)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        if let Verdict::Eliminated { seat } = outcome.verdict {
            let survivors: Vec<SeatId> =
                proposers.iter().copied().filter(|&s| s != seat).collect();
            prop_assert_eq!(survivors.len(), proposers.len() - 1);
            // The eliminated seat holds the (tied-)lowest percentage.
            let own = outcome.percentages[&seat];
            for (&p, &pct) in &outcome.percentages {
                if p != seat {
                    prop_assert!(pct >= own,
                        "seat {p} at {pct}% sits below eliminated {seat} at {own}%");
                }
            }
        }
    }

    /// Two-seat rounds always produce a winner; the game cannot stall at
    /// the endgame.
    #[test]
    fn prop_two_seats_always_finish(
        weights in proptest::collection::vec(0u32..100, 2),
    ) {
        let proposers = vec![0u8, 1];
        let proposals: BTreeMap<SeatId, Allocation> = proposers
            .iter()
            .map(|&s| (s, Allocation::self_take_all(s)))
            .collect();
        let raw: BTreeMap<SeatId, u32> =
            proposers.iter().copied().zip(weights).collect();
        let ballot = Ballot::normalized(&raw, &proposers)
            .map(|(b, _)| b)
            .unwrap_or_else(|| panic!("non-empty proposers"));
        let ballots = BTreeMap::from([(0u8, ballot.clone()), (1u8, ballot)]);

        let outcome = resolve_round(2, &proposals, &ballots)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let is_winner = matches!(outcome.verdict, Verdict::Winner { .. });
        prop_assert!(is_winner);
    }
}
