//! Allocations and ballots: 100-unit share maps with normalization.
//!
//! Providers are advisory and may return maps that do not sum to 100.
//! Everything that enters [`GameState`](crate::domain::state::GameState)
//! goes through [`normalize_shares`] first, so the sum invariant holds for
//! every committed value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::state::SeatId;

/// Every committed allocation and ballot sums to exactly this.
pub const SHARE_SUM: u32 = 100;

/// Submissions within this distance of [`SHARE_SUM`] are silently fixed up;
/// anything further off is a malformed submission (still renormalized, but
/// flagged so the coordinator records a warning).
pub const SHARE_TOLERANCE: u32 = 1;

/// A seat's proposed split of the pool across seats. Sum is always 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation(BTreeMap<SeatId, u32>);

/// A seat's distribution of voting weight across proposers. Sum is always 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot(BTreeMap<SeatId, u32>);

/// Result of pushing a raw share map through normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub shares: BTreeMap<SeatId, u32>,
    /// Sum of the raw input, for diagnostics.
    pub original_sum: u64,
    /// True when the raw input was outside `SHARE_SUM ± SHARE_TOLERANCE`.
    pub malformed: bool,
}

/// Proportionally renormalize `raw` so it sums to exactly [`SHARE_SUM`].
///
/// Uses floor division per entry and pins the rounding remainder on
/// `remainder_key` (inserted if absent), so the result is deterministic and
/// never depends on map iteration quirks. An all-zero or empty input
/// degenerates to `{remainder_key: 100}`.
pub fn normalize_shares(raw: &BTreeMap<SeatId, u32>, remainder_key: SeatId) -> Normalized {
    let original_sum: u64 = raw.values().map(|v| *v as u64).sum();
    let malformed = original_sum.abs_diff(SHARE_SUM as u64) > SHARE_TOLERANCE as u64;

    if original_sum == SHARE_SUM as u64 {
        return Normalized {
            shares: raw.clone(),
            original_sum,
            malformed: false,
        };
    }

    let mut shares: BTreeMap<SeatId, u32> = BTreeMap::new();
    let mut assigned: u32 = 0;
    if original_sum > 0 {
        for (&seat, &value) in raw {
            let share = ((value as u64 * SHARE_SUM as u64) / original_sum) as u32;
            assigned += share;
            shares.insert(seat, share);
        }
    }
    let remainder = SHARE_SUM - assigned;
    *shares.entry(remainder_key).or_insert(0) += remainder;

    Normalized {
        shares,
        original_sum,
        malformed,
    }
}

/// Even split across `keys`, with the rounding remainder pinned on the first
/// (lowest) key. Empty `keys` is a caller bug; callers always pass at least
/// one proposer or seat.
fn even_split(keys: &[SeatId]) -> BTreeMap<SeatId, u32> {
    debug_assert!(!keys.is_empty(), "even_split requires at least one key");
    let mut shares: BTreeMap<SeatId, u32> = BTreeMap::new();
    if keys.is_empty() {
        return shares;
    }
    let base = SHARE_SUM / keys.len() as u32;
    for &k in keys {
        shares.insert(k, base);
    }
    let remainder = SHARE_SUM - base * keys.len() as u32;
    if let Some(first) = keys.iter().min() {
        *shares.entry(*first).or_insert(0) += remainder;
    }
    shares
}

impl Allocation {
    /// Normalize a raw proposal from `proposer`. The rounding remainder (and
    /// the degenerate all-zero case) lands on the proposer's own seat.
    pub fn normalized(raw: &BTreeMap<SeatId, u32>, proposer: SeatId) -> (Self, Normalized) {
        let n = normalize_shares(raw, proposer);
        (Self(n.shares.clone()), n)
    }

    /// Fallback proposal for a seat that failed to submit: everything to self.
    pub fn self_take_all(proposer: SeatId) -> Self {
        let mut shares = BTreeMap::new();
        shares.insert(proposer, SHARE_SUM);
        Self(shares)
    }

    pub fn share(&self, seat: SeatId) -> u32 {
        self.0.get(&seat).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SeatId, &u32)> {
        self.0.iter()
    }

    pub fn sum(&self) -> u32 {
        self.0.values().sum()
    }
}

impl Ballot {
    /// Normalize a raw ballot from `voter` over the given proposers. Weights
    /// for unknown proposers must already be filtered out by the caller; the
    /// rounding remainder is pinned on the lowest proposer id.
    pub fn normalized(raw: &BTreeMap<SeatId, u32>, proposers: &[SeatId]) -> Option<(Self, Normalized)> {
        let lowest = proposers.iter().min().copied()?;
        let n = normalize_shares(raw, lowest);
        Some((Self(n.shares.clone()), n))
    }

    /// Fallback ballot for a silent voter: even split across all proposers.
    pub fn even_split(proposers: &[SeatId]) -> Option<Self> {
        if proposers.is_empty() {
            return None;
        }
        Some(Self(even_split(proposers)))
    }

    pub fn weight(&self, proposer: SeatId) -> u32 {
        self.0.get(&proposer).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SeatId, &u32)> {
        self.0.iter()
    }

    pub fn sum(&self) -> u32 {
        self.0.values().sum()
    }
}
