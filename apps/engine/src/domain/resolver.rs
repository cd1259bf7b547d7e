//! Voting/elimination resolver: pure function from collected proposals and
//! ballots to a round verdict.
//!
//! Tie-break policy (deliberately explicit rather than collection-order
//! incidental): ties among equally-lowest proposers at elimination time, and
//! equal tallies in the two-seat endgame, both resolve to the lowest
//! join-order seat id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::allocation::{Allocation, Ballot};
use crate::domain::state::SeatId;
use crate::errors::domain::DomainError;

/// A proposal wins outright at or above this percentage of the active vote.
pub const SUPERMAJORITY_PCT: u32 = 61;

/// Round verdict computed by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verdict {
    /// A proposal cleared the threshold (or won the two-seat majority);
    /// terminal for the game.
    Winner { proposer: SeatId },
    /// No winner; the lowest-scoring proposer leaves the field.
    Eliminated { seat: SeatId },
}

/// Full resolver output, committed into the game state with `EndVoting`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    /// Raw voting weight per proposer, summed over all ballots.
    pub tallies: BTreeMap<SeatId, u32>,
    /// `round(tally / active_count)`; can exceed 100 when eliminated seats
    /// vote, which is fine for the ordering the verdict needs.
    pub percentages: BTreeMap<SeatId, u32>,
    pub verdict: Verdict,
}

/// Resolve a round from the committed proposals and ballots.
///
/// Every ballot (active and eliminated voters alike) counts toward the
/// tallies; the percentage denominator is `active_count * 100`.
pub fn resolve_round(
    active_count: usize,
    proposals: &BTreeMap<SeatId, Allocation>,
    ballots: &BTreeMap<SeatId, Ballot>,
) -> Result<RoundOutcome, DomainError> {
    if active_count < 2 {
        return Err(DomainError::validation(format!(
            "resolver requires at least two active seats, got {active_count}"
        )));
    }
    if proposals.is_empty() {
        return Err(DomainError::validation("resolver requires proposals"));
    }
    if ballots.is_empty() {
        return Err(DomainError::validation("resolver requires ballots"));
    }

    let mut tallies: BTreeMap<SeatId, u32> = proposals.keys().map(|&p| (p, 0)).collect();
    for ballot in ballots.values() {
        for (&proposer, &weight) in ballot.iter() {
            if let Some(t) = tallies.get_mut(&proposer) {
                *t += weight;
            }
        }
    }

    let denominator = active_count as u64 * 100;
    let percentages: BTreeMap<SeatId, u32> = tallies
        .iter()
        .map(|(&p, &t)| {
            let pct = ((t as u64 * 100 + denominator / 2) / denominator) as u32;
            (p, pct)
        })
        .collect();

    let verdict = if active_count == 2 {
        // Pure majority rule once the field narrows to two: the higher tally
        // wins outright regardless of the supermajority threshold. Ties go to
        // the lowest seat id.
        Verdict::Winner {
            proposer: highest(&tallies),
        }
    } else {
        let best = highest(&percentages);
        let best_pct = percentages.get(&best).copied().unwrap_or(0);
        if best_pct >= SUPERMAJORITY_PCT {
            Verdict::Winner { proposer: best }
        } else {
            Verdict::Eliminated {
                seat: lowest(&percentages),
            }
        }
    };

    Ok(RoundOutcome {
        tallies,
        percentages,
        verdict,
    })
}

/// Resolve a direct-nomination elimination: each voter nominates one seat and
/// the most-nominated active seat is eliminated. Nominations for inactive or
/// unknown seats are ignored; with no valid nomination the lowest active seat
/// id is eliminated.
pub fn resolve_nominations(
    active_seats: &[SeatId],
    nominations: &BTreeMap<SeatId, SeatId>,
) -> Result<SeatId, DomainError> {
    let lowest_active = active_seats.iter().min().copied().ok_or_else(|| {
        DomainError::validation("nomination resolution requires at least one active seat")
    })?;

    let mut counts: BTreeMap<SeatId, u32> = BTreeMap::new();
    for target in nominations.values() {
        if active_seats.contains(target) {
            *counts.entry(*target).or_insert(0) += 1;
        }
    }
    if counts.is_empty() {
        return Ok(lowest_active);
    }
    Ok(highest(&counts))
}

/// Key with the highest value; ties resolve to the lowest key because the
/// map iterates in key order and replacement is strict.
fn highest(scores: &BTreeMap<SeatId, u32>) -> SeatId {
    let mut best_key = 0;
    let mut best_value = None;
    for (&k, &v) in scores {
        if best_value.map_or(true, |bv| v > bv) {
            best_key = k;
            best_value = Some(v);
        }
    }
    best_key
}

/// Key with the lowest value; ties resolve to the lowest key.
fn lowest(scores: &BTreeMap<SeatId, u32>) -> SeatId {
    let mut best_key = 0;
    let mut best_value = None;
    for (&k, &v) in scores {
        if best_value.map_or(true, |bv| v < bv) {
            best_key = k;
            best_value = Some(v);
        }
    }
    best_key
}
