//! Test-only game state builders for domain unit tests.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::domain::allocation::{Allocation, Ballot};
use crate::domain::events::{transition, GameEvent};
use crate::domain::state::{GameState, ProviderKind, SeatId};

/// A lobby with `n` seats, none ready.
pub fn lobby(n: usize) -> GameState {
    let mut state = GameState::new(Uuid::new_v4(), 10);
    for i in 0..n {
        state.add_seat(format!("seat-{i}"), ProviderKind::Scripted);
    }
    state
}

/// Apply an event that the test expects to succeed.
pub fn apply(state: &GameState, event: GameEvent) -> GameState {
    transition(state, &event)
        .unwrap_or_else(|e| panic!("expected {} to apply: {e}", event.name()))
}

/// Everyone ready, game started: strategy phase.
pub fn in_strategy(n: usize) -> GameState {
    let mut state = lobby(n);
    for seat in state.seat_ids() {
        state = apply(&state, GameEvent::PlayerReady { seat });
    }
    apply(&state, GameEvent::StartGame)
}

/// Strategies in, round one opened: negotiation phase.
pub fn in_negotiation(n: usize) -> GameState {
    let mut state = in_strategy(n);
    for seat in state.seat_ids() {
        state = apply(
            &state,
            GameEvent::SubmitStrategy {
                seat,
                strategy: format!("strategy of seat {seat}"),
            },
        );
    }
    apply(&state, GameEvent::AllStrategiesSubmitted)
}

/// Negotiation closed: proposal phase, no proposals yet.
pub fn in_proposal(n: usize) -> GameState {
    apply(&in_negotiation(n), GameEvent::Continue)
}

/// Every active seat proposed keeping the pool: voting phase.
pub fn in_voting(n: usize) -> GameState {
    let mut state = in_proposal(n);
    for seat in state.active_seats() {
        state = apply(
            &state,
            GameEvent::SubmitProposal {
                seat,
                allocation: Allocation::self_take_all(seat),
            },
        );
    }
    apply(&state, GameEvent::Continue)
}

/// A ballot putting all weight on one proposer.
pub fn ballot_for(proposer: SeatId) -> Ballot {
    let (ballot, _) = Ballot::normalized(&BTreeMap::from([(proposer, 100)]), &[proposer])
        .unwrap_or_else(|| panic!("proposer list cannot be empty"));
    ballot
}
