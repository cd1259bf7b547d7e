//! Public snapshot API for observing game state without exposing internals.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::allocation::Allocation;
use crate::domain::resolver::RoundOutcome;
use crate::domain::state::{GameState, Phase, ProviderKind, SeatId};

/// Public info about a single seat in the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatPublic {
    pub seat: SeatId,
    pub display_name: String,
    pub kind: ProviderKind,
    pub connected: bool,
    pub ready: bool,
    pub eliminated: bool,
}

/// Terminal winner facts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerPublic {
    pub seat: SeatId,
    pub allocation: Allocation,
}

/// Top-level snapshot: everything the state log and spectators see.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub game_id: Uuid,
    pub phase: Phase,
    pub round_no: u8,
    pub max_rounds: u8,
    pub seats: Vec<SeatPublic>,
    pub speaking_order: Vec<SeatId>,
    pub proposals: BTreeMap<SeatId, Allocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round_outcome: Option<RoundOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<WinnerPublic>,
    pub ended: bool,
}

impl GameSnapshot {
    pub fn of(state: &GameState) -> Self {
        Self {
            game_id: state.game_id,
            phase: state.phase,
            round_no: state.round_no,
            max_rounds: state.max_rounds,
            seats: state
                .seats
                .iter()
                .map(|s| SeatPublic {
                    seat: s.id,
                    display_name: s.display_name.clone(),
                    kind: s.kind,
                    connected: s.connected,
                    ready: s.ready,
                    eliminated: state.eliminated.contains(&s.id),
                })
                .collect(),
            speaking_order: state.speaking_order.clone(),
            proposals: state.proposals.clone(),
            round_outcome: state.round_outcome.clone(),
            winner: state
                .winning_allocation
                .as_ref()
                .map(|(seat, allocation)| WinnerPublic {
                    seat: *seat,
                    allocation: allocation.clone(),
                }),
            ended: state.ended,
        }
    }
}
