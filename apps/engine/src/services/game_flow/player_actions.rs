//! Inbound seat-action validation and routing.
//!
//! Pure function over the published snapshot: decide whether a submission
//! from a seat is acceptable right now, and if so which internal route it
//! takes. Late, early or wrong-phase submissions are rejected here with an
//! explicit error instead of being silently dropped.

use crate::domain::{GameSnapshot, Phase, SeatId};
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::protocol::SeatActionMsg;
use crate::providers::HumanDecision;

/// Where an accepted action goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutedAction {
    /// Lobby ready-up; handled by the game task's command channel.
    Ready,
    /// A decision for the seat's human provider inbox.
    Decision(HumanDecision),
}

/// Validate `action` from `seat` against the published snapshot.
pub fn route_action(
    snapshot: &GameSnapshot,
    seat: SeatId,
    action: SeatActionMsg,
) -> Result<RoutedAction, DomainError> {
    let seat_info = snapshot
        .seats
        .iter()
        .find(|s| s.seat == seat)
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Seat, format!("unknown seat {seat}")))?;

    if snapshot.ended {
        return Err(DomainError::phase_mismatch(snapshot.phase, action.name()));
    }

    let phase_ok = match &action {
        SeatActionMsg::Ready => snapshot.phase == Phase::Lobby,
        SeatActionMsg::SubmitStrategy { .. } => snapshot.phase == Phase::Strategy,
        SeatActionMsg::SendMessage { .. } => snapshot.phase == Phase::Negotiation,
        SeatActionMsg::SubmitProposal { .. } => snapshot.phase == Phase::Proposal,
        SeatActionMsg::SubmitBallot { .. } => snapshot.phase == Phase::Voting,
        // Nominations are gathered while the round is being resolved.
        SeatActionMsg::NominateElimination { .. } => snapshot.phase == Phase::Voting,
    };
    if !phase_ok {
        return Err(DomainError::phase_mismatch(snapshot.phase, action.name()));
    }

    // Eliminated seats keep talking and voting; proposing (and nominating
    // a seat for elimination) is reserved for active seats.
    let needs_active = matches!(
        &action,
        SeatActionMsg::SubmitProposal { .. }
            | SeatActionMsg::SubmitStrategy { .. }
            | SeatActionMsg::NominateElimination { .. }
    );
    if needs_active && seat_info.eliminated {
        return Err(DomainError::seat_eliminated(seat, action.name()));
    }

    if let SeatActionMsg::SubmitProposal { .. } = &action {
        if snapshot.proposals.contains_key(&seat) {
            return Err(DomainError::validation(format!(
                "seat {seat} already proposed this round"
            )));
        }
    }

    Ok(match action {
        SeatActionMsg::Ready => RoutedAction::Ready,
        SeatActionMsg::SubmitStrategy { strategy } => {
            RoutedAction::Decision(HumanDecision::Strategy(strategy))
        }
        SeatActionMsg::SendMessage { text } => RoutedAction::Decision(HumanDecision::Message(text)),
        SeatActionMsg::SubmitProposal { allocation } => {
            RoutedAction::Decision(HumanDecision::Proposal(allocation))
        }
        SeatActionMsg::SubmitBallot { ballot } => {
            RoutedAction::Decision(HumanDecision::Ballot(ballot))
        }
        SeatActionMsg::NominateElimination { seat: target } => {
            RoutedAction::Decision(HumanDecision::Nomination(target))
        }
    })
}
