use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::allocation::{Allocation, Ballot};
use crate::domain::resolver::RoundOutcome;
use crate::errors::domain::{DomainError, NotFoundKind};

pub type SeatId = u8;

/// Minimum number of ready seats required to start a game.
pub const MIN_SEATS: usize = 2;

/// Overall game progression phases.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Game created; seats join and ready up.
    Lobby,
    /// Each seat submits a private strategy before round 1.
    Strategy,
    /// Seats exchange negotiation messages in speaking order.
    Negotiation,
    /// Active seats author allocation proposals.
    Proposal,
    /// Every seat casts a ballot over the proposals.
    Voting,
    /// Round verdict is committed (elimination recorded).
    Elimination,
    /// Terminal: a proposal won and the pool is settled.
    Endgame,
    /// Terminal: cancelled or max rounds exhausted; no winner.
    End,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Endgame | Phase::End)
    }
}

/// Which kind of decision provider backs a seat.
///
/// Display metadata only; decision dispatch goes through the
/// [`DecisionProvider`](crate::providers::DecisionProvider) trait and never
/// branches on this tag.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Human,
    Scripted,
    External,
}

/// One player slot within a game instance.
///
/// Seats are created at game creation and never deleted; elimination is
/// recorded in [`GameState::eliminated`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub id: SeatId,
    pub display_name: String,
    pub kind: ProviderKind,
    pub connected: bool,
    pub ready: bool,
}

/// One entry in the negotiation transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationMessage {
    pub round_no: u8,
    pub seat: SeatId,
    pub text: String,
}

/// Entire game container, sufficient for pure domain operations.
///
/// Invariants:
/// - `round_no` is monotonically increasing;
/// - the active seat count is monotonically non-increasing;
/// - phase transitions only happen through
///   [`transition`](crate::domain::events::transition).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub game_id: Uuid,
    pub phase: Phase,
    /// Round number, 1-based once the first negotiation starts; 0 before.
    pub round_no: u8,
    pub max_rounds: u8,
    /// Seats in join order; `SeatId` indexes into this vec.
    pub seats: Vec<Seat>,
    pub eliminated: BTreeSet<SeatId>,
    pub strategies: BTreeMap<SeatId, String>,
    /// Current round's proposals, keyed by proposer.
    pub proposals: BTreeMap<SeatId, Allocation>,
    /// Current round's ballots, keyed by voter.
    pub ballots: BTreeMap<SeatId, Ballot>,
    pub speaking_order: Vec<SeatId>,
    pub transcript: Vec<NegotiationMessage>,
    /// Resolver output for the round currently being committed.
    pub round_outcome: Option<RoundOutcome>,
    /// Terminal winning proposal, set on entry to `Endgame`.
    pub winning_allocation: Option<(SeatId, Allocation)>,
    pub ended: bool,
}

impl GameState {
    pub fn new(game_id: Uuid, max_rounds: u8) -> Self {
        Self {
            game_id,
            phase: Phase::Lobby,
            round_no: 0,
            max_rounds,
            seats: Vec::new(),
            eliminated: BTreeSet::new(),
            strategies: BTreeMap::new(),
            proposals: BTreeMap::new(),
            ballots: BTreeMap::new(),
            speaking_order: Vec::new(),
            transcript: Vec::new(),
            round_outcome: None,
            winning_allocation: None,
            ended: false,
        }
    }

    /// Add a seat during the lobby. Returns the assigned seat id.
    pub fn add_seat(&mut self, display_name: impl Into<String>, kind: ProviderKind) -> SeatId {
        let id = self.seats.len() as SeatId;
        self.seats.push(Seat {
            id,
            display_name: display_name.into(),
            kind,
            connected: true,
            ready: false,
        });
        id
    }

    pub fn seat(&self, id: SeatId) -> Option<&Seat> {
        self.seats.get(id as usize)
    }

    pub fn seat_ids(&self) -> Vec<SeatId> {
        self.seats.iter().map(|s| s.id).collect()
    }

    pub fn is_active(&self, id: SeatId) -> bool {
        (id as usize) < self.seats.len() && !self.eliminated.contains(&id)
    }

    /// Non-eliminated seats in join order.
    pub fn active_seats(&self) -> Vec<SeatId> {
        self.seats
            .iter()
            .map(|s| s.id)
            .filter(|id| !self.eliminated.contains(id))
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.seats.len() - self.eliminated.len()
    }

    pub fn ready_count(&self) -> usize {
        self.seats.iter().filter(|s| s.ready).count()
    }
}

/// Speaking order for a round: the given seats rotated by the round number,
/// so a different seat opens each round.
pub fn speaking_order_for_round(seat_ids: &[SeatId], round_no: u8) -> Vec<SeatId> {
    if seat_ids.is_empty() {
        return Vec::new();
    }
    let offset = (round_no.saturating_sub(1) as usize) % seat_ids.len();
    let mut order = Vec::with_capacity(seat_ids.len());
    order.extend_from_slice(&seat_ids[offset..]);
    order.extend_from_slice(&seat_ids[..offset]);
    order
}

pub fn require_seat<'a>(
    state: &'a GameState,
    id: SeatId,
    ctx: &'static str,
) -> Result<&'a Seat, DomainError> {
    state
        .seat(id)
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Seat, format!("seat {id} ({ctx})")))
}

pub fn require_active(state: &GameState, id: SeatId, ctx: &'static str) -> Result<(), DomainError> {
    require_seat(state, id, ctx)?;
    if state.eliminated.contains(&id) {
        return Err(DomainError::validation(format!(
            "seat {id} is eliminated ({ctx})"
        )));
    }
    Ok(())
}

pub fn require_proposal<'a>(
    state: &'a GameState,
    proposer: SeatId,
    ctx: &'static str,
) -> Result<&'a Allocation, DomainError> {
    state.proposals.get(&proposer).ok_or_else(|| {
        DomainError::not_found(
            NotFoundKind::Proposal,
            format!("proposal by seat {proposer} ({ctx})"),
        )
    })
}
