//! The game state visible to a single seat's decision provider.

use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::allocation::Allocation;
use crate::domain::state::{GameState, NegotiationMessage, Phase, SeatId};

/// Immutable per-request view handed to a [`DecisionProvider`].
///
/// Built fresh for every decision request from the committed game state, so
/// providers never observe in-flight mutation. Only the requesting seat's own
/// strategy is included.
///
/// [`DecisionProvider`]: crate::providers::DecisionProvider
#[derive(Debug, Clone, Serialize)]
pub struct RoundContext {
    pub game_id: Uuid,
    /// The seat this request is for.
    pub seat: SeatId,
    pub phase: Phase,
    pub round_no: u8,
    pub max_rounds: u8,
    pub entry_fee: i64,
    pub pool: i64,
    pub seats: Vec<SeatId>,
    pub active_seats: Vec<SeatId>,
    pub eliminated: Vec<SeatId>,
    pub transcript: Vec<NegotiationMessage>,
    /// Committed proposals; populated once voting opens.
    pub proposals: BTreeMap<SeatId, Allocation>,
    pub own_strategy: Option<String>,
}

impl RoundContext {
    pub fn for_seat(state: &GameState, seat: SeatId, entry_fee: i64) -> Self {
        Self {
            game_id: state.game_id,
            seat,
            phase: state.phase,
            round_no: state.round_no,
            max_rounds: state.max_rounds,
            entry_fee,
            pool: state.seats.len() as i64 * entry_fee,
            seats: state.seat_ids(),
            active_seats: state.active_seats(),
            eliminated: state.eliminated.iter().copied().collect(),
            transcript: state.transcript.clone(),
            proposals: state.proposals.clone(),
            own_strategy: state.strategies.get(&seat).cloned(),
        }
    }

    /// Active seats other than the requesting one.
    pub fn rivals(&self) -> Vec<SeatId> {
        self.active_seats
            .iter()
            .copied()
            .filter(|&s| s != self.seat)
            .collect()
    }
}
