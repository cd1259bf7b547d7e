//! Economic settlement: pool, payouts, profits, and the zero-sum oracle.
//!
//! Every seat pays `entry_fee` up front; the pool is split by the winning
//! allocation. `sum(profit)` must be zero within one rounding unit per seat,
//! and a violation is fatal for that specific game only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::allocation::{Allocation, SHARE_SUM};
use crate::domain::state::SeatId;
use crate::errors::domain::DomainError;

/// Settlement of a completed game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub pool: i64,
    pub entry_fee: i64,
    pub payouts: BTreeMap<SeatId, i64>,
    pub profits: BTreeMap<SeatId, i64>,
    /// `sum(profits)`; zero up to truncation dust within tolerance.
    pub net: i64,
}

/// Settle the pool across `seat_ids` by the winning allocation.
///
/// `payout[s] = allocation[s] * pool / 100` (integer floor) and
/// `profit[s] = payout[s] - entry_fee`. The oracle accepts
/// `|sum(profit)| <= seat_count` (one rounding unit per seat); anything
/// beyond that is an [`DomainError::EconomicInvariantViolation`].
pub fn settle(
    seat_ids: &[SeatId],
    allocation: &Allocation,
    entry_fee: i64,
) -> Result<Settlement, DomainError> {
    if seat_ids.is_empty() {
        return Err(DomainError::validation("settlement requires seats"));
    }
    if entry_fee <= 0 {
        return Err(DomainError::validation(format!(
            "entry fee must be positive, got {entry_fee}"
        )));
    }

    let pool = seat_ids.len() as i64 * entry_fee;
    let mut payouts = BTreeMap::new();
    let mut profits = BTreeMap::new();
    let mut net: i64 = 0;

    for &seat in seat_ids {
        let share = allocation.share(seat) as i64;
        let payout = share * pool / SHARE_SUM as i64;
        let profit = payout - entry_fee;
        net += profit;
        payouts.insert(seat, payout);
        profits.insert(seat, profit);
    }

    let tolerance = seat_ids.len() as i64;
    if net.abs() > tolerance {
        return Err(DomainError::EconomicInvariantViolation { net, tolerance });
    }

    Ok(Settlement {
        pool,
        entry_fee,
        payouts,
        profits,
        net,
    })
}
