use std::collections::BTreeMap;

use crate::domain::allocation::Allocation;
use crate::domain::settlement::settle;
use crate::errors::domain::DomainError;

#[test]
fn clean_split_settles_exactly() {
    // 4 seats x 100 = 400 pool, winner takes all.
    let allocation = Allocation::self_take_all(2);
    let s = settle(&[0, 1, 2, 3], &allocation, 100).unwrap();

    assert_eq!(s.pool, 400);
    assert_eq!(s.payouts, BTreeMap::from([(0, 0), (1, 0), (2, 400), (3, 0)]));
    assert_eq!(
        s.profits,
        BTreeMap::from([(0, -100), (1, -100), (2, 300), (3, -100)])
    );
    assert_eq!(s.net, 0);
}

#[test]
fn shared_allocation_is_zero_sum() {
    let (allocation, _) =
        Allocation::normalized(&BTreeMap::from([(0u8, 40u32), (1, 35), (2, 25)]), 0);
    let s = settle(&[0, 1, 2], &allocation, 100).unwrap();

    assert_eq!(s.pool, 300);
    assert_eq!(s.payouts, BTreeMap::from([(0, 120), (1, 105), (2, 75)]));
    assert_eq!(s.profits, BTreeMap::from([(0, 20), (1, 5), (2, -25)]));
    assert_eq!(s.net, 0);
}

#[test]
fn truncation_dust_stays_within_tolerance() {
    // 33/33/34 of a 299-unit-fee pool: payouts floor, dust <= seat count.
    let (allocation, _) =
        Allocation::normalized(&BTreeMap::from([(0u8, 33u32), (1, 33), (2, 34)]), 0);
    let s = settle(&[0, 1, 2], &allocation, 299).unwrap();

    let paid: i64 = s.payouts.values().sum();
    assert!(paid <= s.pool);
    assert!(s.net.abs() <= 3);
}

#[test]
fn eliminated_seats_settle_at_their_share() {
    // An eliminated seat holds no share of the winning allocation, so its
    // profit is exactly the lost stake.
    let allocation = Allocation::self_take_all(1);
    let s = settle(&[0, 1, 2], &allocation, 50).unwrap();
    assert_eq!(s.profits[&0], -50);
    assert_eq!(s.profits[&2], -50);
    assert_eq!(s.profits[&1], 100);
}

#[test]
fn broken_allocation_trips_the_oracle() {
    // An allocation whose shares sit on seats outside the settlement drops
    // the whole pool on the floor; the oracle refuses to settle it.
    let (allocation, _) = Allocation::normalized(&BTreeMap::from([(9u8, 100u32)]), 9);
    let err = settle(&[0, 1], &allocation, 100).unwrap_err();
    match err {
        DomainError::EconomicInvariantViolation { net, tolerance } => {
            assert_eq!(net, -200);
            assert_eq!(tolerance, 2);
        }
        other => panic!("expected economic invariant violation, got {other:?}"),
    }
}

#[test]
fn invalid_inputs_are_rejected() {
    let allocation = Allocation::self_take_all(0);
    assert!(settle(&[], &allocation, 100).is_err());
    assert!(settle(&[0, 1], &allocation, 0).is_err());
    assert!(settle(&[0, 1], &allocation, -5).is_err());
}
