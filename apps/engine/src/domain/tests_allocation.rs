use std::collections::BTreeMap;

use crate::domain::allocation::{normalize_shares, Allocation, Ballot, SHARE_SUM};

#[test]
fn exact_sum_passes_through_unchanged() {
    let raw = BTreeMap::from([(0u8, 40u32), (1, 35), (2, 25)]);
    let n = normalize_shares(&raw, 0);
    assert_eq!(n.shares, raw);
    assert!(!n.malformed);
    assert_eq!(n.original_sum, 100);
}

#[test]
fn off_by_one_is_fixed_up_without_the_malformed_flag() {
    // 99: within tolerance, still renormalized to exactly 100.
    let raw = BTreeMap::from([(0u8, 33u32), (1, 33), (2, 33)]);
    let n = normalize_shares(&raw, 1);
    assert_eq!(n.shares.values().sum::<u32>(), SHARE_SUM);
    assert!(!n.malformed);

    // 101 likewise.
    let raw = BTreeMap::from([(0u8, 34u32), (1, 34), (2, 33)]);
    let n = normalize_shares(&raw, 1);
    assert_eq!(n.shares.values().sum::<u32>(), SHARE_SUM);
    assert!(!n.malformed);
}

#[test]
fn far_off_sums_are_renormalized_and_flagged() {
    let raw = BTreeMap::from([(0u8, 200u32), (1, 200)]);
    let n = normalize_shares(&raw, 0);
    assert_eq!(n.shares.values().sum::<u32>(), SHARE_SUM);
    assert!(n.malformed);
    assert_eq!(n.original_sum, 400);
    // Proportions survive: equal inputs stay equal up to the remainder.
    assert_eq!(n.shares[&0], 50);
    assert_eq!(n.shares[&1], 50);
}

#[test]
fn remainder_lands_on_the_remainder_key() {
    // 3 × 30 = 90 -> each becomes 33, remainder 1 pinned on seat 2.
    let raw = BTreeMap::from([(0u8, 30u32), (1, 30), (2, 30)]);
    let n = normalize_shares(&raw, 2);
    assert_eq!(n.shares[&0], 33);
    assert_eq!(n.shares[&1], 33);
    assert_eq!(n.shares[&2], 34);
}

#[test]
fn remainder_key_is_inserted_when_absent() {
    let raw = BTreeMap::from([(1u8, 30u32), (2, 30)]);
    let n = normalize_shares(&raw, 0);
    assert_eq!(n.shares.values().sum::<u32>(), SHARE_SUM);
    // 30/30 scales to 50/50 exactly; the inserted key carries no remainder
    // but is still present.
    assert_eq!(n.shares[&0], 0);
}

#[test]
fn empty_and_all_zero_inputs_degenerate_to_the_remainder_key() {
    let n = normalize_shares(&BTreeMap::new(), 3);
    assert_eq!(n.shares, BTreeMap::from([(3u8, 100u32)]));
    assert!(n.malformed);

    let raw = BTreeMap::from([(0u8, 0u32), (1, 0)]);
    let n = normalize_shares(&raw, 1);
    assert_eq!(n.shares[&1], 100);
    assert_eq!(n.shares.values().sum::<u32>(), SHARE_SUM);
}

#[test]
fn allocation_fallback_keeps_the_pool() {
    let a = Allocation::self_take_all(2);
    assert_eq!(a.share(2), 100);
    assert_eq!(a.share(0), 0);
    assert_eq!(a.sum(), SHARE_SUM);
}

#[test]
fn allocation_normalized_pins_remainder_on_the_proposer() {
    let raw = BTreeMap::from([(0u8, 30u32), (1, 30), (2, 30)]);
    let (a, n) = Allocation::normalized(&raw, 0);
    assert_eq!(a.sum(), SHARE_SUM);
    assert_eq!(a.share(0), 34);
    assert!(!n.malformed);
}

#[test]
fn ballot_even_split_pins_remainder_on_the_lowest_proposer() {
    let b = Ballot::even_split(&[1, 2, 3]).unwrap();
    assert_eq!(b.sum(), SHARE_SUM);
    assert_eq!(b.weight(1), 34);
    assert_eq!(b.weight(2), 33);
    assert_eq!(b.weight(3), 33);

    assert!(Ballot::even_split(&[]).is_none());
}

#[test]
fn ballot_normalized_pins_remainder_on_the_lowest_proposer() {
    let raw = BTreeMap::from([(2u8, 1u32), (5, 1), (7, 1)]);
    let (b, _) = Ballot::normalized(&raw, &[2, 5, 7]).unwrap();
    assert_eq!(b.sum(), SHARE_SUM);
    assert_eq!(b.weight(2), 34);
}
