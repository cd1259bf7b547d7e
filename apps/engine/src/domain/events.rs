//! The phase controller: a pure `transition(state, event) -> state | error`
//! over immutable snapshots.
//!
//! No ambient mutation: callers get a fresh [`GameState`] back and commit it
//! atomically (or discard it on error; a rejected event leaves the input
//! untouched by construction).

use crate::domain::allocation::{Allocation, Ballot};
use crate::domain::resolver::{RoundOutcome, Verdict};
use crate::domain::state::{
    require_active, require_proposal, require_seat, speaking_order_for_round, GameState, Phase,
    SeatId, MIN_SEATS,
};
use crate::errors::domain::DomainError;

/// Every legal input to the phase controller.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PlayerReady { seat: SeatId },
    StartGame,
    SubmitStrategy { seat: SeatId, strategy: String },
    AllStrategiesSubmitted,
    SubmitProposal { seat: SeatId, allocation: Allocation },
    SubmitVote { seat: SeatId, ballot: Ballot },
    EndVoting { outcome: RoundOutcome },
    Eliminate { seat: SeatId },
    /// Advance the round cycle: close negotiation, close proposals, or start
    /// the next round after an elimination (or end the game when
    /// `max_rounds` is exhausted).
    Continue,
    /// Operator cancel; legal from any phase, terminal, no winner computed.
    End,
}

impl GameEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::PlayerReady { .. } => "PLAYER_READY",
            GameEvent::StartGame => "START_GAME",
            GameEvent::SubmitStrategy { .. } => "SUBMIT_STRATEGY",
            GameEvent::AllStrategiesSubmitted => "ALL_STRATEGIES_SUBMITTED",
            GameEvent::SubmitProposal { .. } => "SUBMIT_PROPOSAL",
            GameEvent::SubmitVote { .. } => "SUBMIT_VOTE",
            GameEvent::EndVoting { .. } => "END_VOTING",
            GameEvent::Eliminate { .. } => "ELIMINATE",
            GameEvent::Continue => "CONTINUE",
            GameEvent::End => "END",
        }
    }
}

fn illegal(state: &GameState, event: &GameEvent) -> DomainError {
    DomainError::illegal_transition(state.phase, event.name())
}

/// Apply `event` to `state`, producing the next state.
///
/// Any event not legal for the current phase is rejected with
/// `IllegalTransition`; the caller's state is unchanged.
pub fn transition(state: &GameState, event: &GameEvent) -> Result<GameState, DomainError> {
    // Operator cancel short-circuits everything else.
    if let GameEvent::End = event {
        let mut next = state.clone();
        next.phase = Phase::End;
        next.ended = true;
        return Ok(next);
    }

    if state.phase.is_terminal() {
        return Err(illegal(state, event));
    }

    let mut next = state.clone();
    match (state.phase, event) {
        (Phase::Lobby, GameEvent::PlayerReady { seat }) => {
            require_seat(state, *seat, "PLAYER_READY")?;
            next.seats[*seat as usize].ready = true;
        }

        (Phase::Lobby, GameEvent::StartGame) => {
            if state.ready_count() < MIN_SEATS {
                return Err(DomainError::validation(format!(
                    "START_GAME requires at least {MIN_SEATS} ready seats, have {}",
                    state.ready_count()
                )));
            }
            next.phase = Phase::Strategy;
        }

        (Phase::Strategy, GameEvent::SubmitStrategy { seat, strategy }) => {
            require_seat(state, *seat, "SUBMIT_STRATEGY")?;
            if state.strategies.contains_key(seat) {
                return Err(DomainError::validation(format!(
                    "seat {seat} already submitted a strategy"
                )));
            }
            next.strategies.insert(*seat, strategy.clone());
        }

        (Phase::Strategy, GameEvent::AllStrategiesSubmitted) => {
            if state.strategies.len() < state.seats.len() {
                return Err(DomainError::validation(format!(
                    "{} of {} strategies submitted",
                    state.strategies.len(),
                    state.seats.len()
                )));
            }
            next.phase = Phase::Negotiation;
            next.round_no = 1;
            next.speaking_order = speaking_order_for_round(&state.seat_ids(), 1);
        }

        (Phase::Negotiation, GameEvent::Continue) => {
            next.phase = Phase::Proposal;
        }

        (Phase::Proposal, GameEvent::SubmitProposal { seat, allocation }) => {
            require_active(state, *seat, "SUBMIT_PROPOSAL")?;
            if state.proposals.contains_key(seat) {
                return Err(DomainError::validation(format!(
                    "seat {seat} already proposed this round"
                )));
            }
            for (&target, _) in allocation.iter() {
                require_seat(state, target, "SUBMIT_PROPOSAL allocation")?;
            }
            next.proposals.insert(*seat, allocation.clone());
        }

        (Phase::Proposal, GameEvent::Continue) => {
            if state.proposals.len() < state.active_count() {
                return Err(DomainError::validation(format!(
                    "{} of {} proposals submitted",
                    state.proposals.len(),
                    state.active_count()
                )));
            }
            next.phase = Phase::Voting;
        }

        (Phase::Voting, GameEvent::SubmitVote { seat, ballot }) => {
            // Eliminated seats still vote; only existence is required.
            require_seat(state, *seat, "SUBMIT_VOTE")?;
            if state.ballots.contains_key(seat) {
                return Err(DomainError::validation(format!(
                    "seat {seat} already voted this round"
                )));
            }
            for (&proposer, _) in ballot.iter() {
                require_proposal(state, proposer, "SUBMIT_VOTE ballot")?;
            }
            next.ballots.insert(*seat, ballot.clone());
        }

        (Phase::Voting, GameEvent::EndVoting { outcome }) => {
            if state.ballots.len() < state.seats.len() {
                return Err(DomainError::validation(format!(
                    "{} of {} ballots submitted",
                    state.ballots.len(),
                    state.seats.len()
                )));
            }
            next.round_outcome = Some(outcome.clone());
            match outcome.verdict {
                Verdict::Winner { proposer } => {
                    let winning = require_proposal(state, proposer, "END_VOTING winner")?.clone();
                    next.winning_allocation = Some((proposer, winning));
                    next.phase = Phase::Endgame;
                    next.ended = true;
                }
                Verdict::Eliminated { .. } => {
                    next.phase = Phase::Elimination;
                }
            }
        }

        (Phase::Elimination, GameEvent::Eliminate { seat }) => {
            require_active(state, *seat, "ELIMINATE")?;
            // The controller only commits what the resolver decided.
            match state.round_outcome.as_ref().map(|o| o.verdict) {
                Some(Verdict::Eliminated { seat: expected }) if expected == *seat => {}
                _ => {
                    return Err(DomainError::validation(format!(
                        "ELIMINATE seat {seat} does not match the round verdict"
                    )));
                }
            }
            next.eliminated.insert(*seat);
        }

        (Phase::Elimination, GameEvent::Continue) => {
            let committed = match state.round_outcome.as_ref().map(|o| o.verdict) {
                Some(Verdict::Eliminated { seat }) => state.eliminated.contains(&seat),
                _ => false,
            };
            if !committed {
                return Err(DomainError::validation(
                    "CONTINUE requires the round's elimination to be committed",
                ));
            }
            if state.round_no >= state.max_rounds {
                // Max rounds exhausted: explicit game over with no winner.
                next.phase = Phase::End;
                next.ended = true;
            } else {
                next.round_no = state.round_no + 1;
                next.phase = Phase::Negotiation;
                next.proposals.clear();
                next.ballots.clear();
                next.round_outcome = None;
                // Eliminated seats keep speaking and voting; they only stop proposing.
                next.speaking_order = speaking_order_for_round(&state.seat_ids(), next.round_no);
            }
        }

        _ => return Err(illegal(state, event)),
    }

    Ok(next)
}
