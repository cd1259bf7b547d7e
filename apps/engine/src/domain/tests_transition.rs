use std::collections::BTreeMap;

use crate::domain::allocation::{Allocation, Ballot};
use crate::domain::events::{transition, GameEvent};
use crate::domain::resolver::{resolve_round, Verdict};
use crate::domain::state::Phase;
use crate::domain::test_state_helpers::{
    apply, ballot_for, in_negotiation, in_proposal, in_strategy, in_voting, lobby,
};
use crate::errors::domain::DomainError;

#[test]
fn lobby_ready_then_start() {
    let mut state = lobby(3);
    assert_eq!(state.phase, Phase::Lobby);

    for seat in state.seat_ids() {
        state = apply(&state, GameEvent::PlayerReady { seat });
    }
    assert_eq!(state.ready_count(), 3);

    let state = apply(&state, GameEvent::StartGame);
    assert_eq!(state.phase, Phase::Strategy);
}

#[test]
fn start_needs_two_ready_seats() {
    let state = lobby(3);
    let state = apply(&state, GameEvent::PlayerReady { seat: 0 });
    let err = transition(&state, &GameEvent::StartGame).unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let state = apply(&state, GameEvent::PlayerReady { seat: 1 });
    // Two ready out of three is enough; the third seat plays from its
    // fallback provider.
    let state = apply(&state, GameEvent::StartGame);
    assert_eq!(state.phase, Phase::Strategy);
}

#[test]
fn ready_for_unknown_seat_is_rejected() {
    let state = lobby(2);
    assert!(transition(&state, &GameEvent::PlayerReady { seat: 9 }).is_err());
}

#[test]
fn wrong_phase_events_are_illegal_transitions() {
    let state = lobby(3);
    let err = transition(
        &state,
        &GameEvent::SubmitProposal {
            seat: 0,
            allocation: Allocation::self_take_all(0),
        },
    )
    .unwrap_err();
    assert!(matches!(err, DomainError::IllegalTransition { .. }));

    let state = in_negotiation(3);
    let err = transition(
        &state,
        &GameEvent::SubmitVote {
            seat: 0,
            ballot: ballot_for(1),
        },
    )
    .unwrap_err();
    assert!(matches!(err, DomainError::IllegalTransition { .. }));
}

#[test]
fn duplicate_strategy_is_rejected() {
    let state = in_strategy(3);
    let state = apply(
        &state,
        GameEvent::SubmitStrategy {
            seat: 0,
            strategy: "hold firm".into(),
        },
    );
    let err = transition(
        &state,
        &GameEvent::SubmitStrategy {
            seat: 0,
            strategy: "actually fold".into(),
        },
    )
    .unwrap_err();
    assert!(err.to_string().contains("already submitted"));
}

#[test]
fn all_strategies_opens_round_one() {
    let state = in_negotiation(4);
    assert_eq!(state.phase, Phase::Negotiation);
    assert_eq!(state.round_no, 1);
    assert_eq!(state.speaking_order, vec![0, 1, 2, 3]);
}

#[test]
fn all_strategies_requires_every_seat() {
    let state = in_strategy(3);
    let state = apply(
        &state,
        GameEvent::SubmitStrategy {
            seat: 0,
            strategy: "x".into(),
        },
    );
    assert!(transition(&state, &GameEvent::AllStrategiesSubmitted).is_err());
}

#[test]
fn proposal_phase_rules() {
    let state = in_proposal(3);

    // Unknown allocation target bounces.
    let raw = BTreeMap::from([(0u8, 50u32), (9u8, 50u32)]);
    let (allocation, _) = Allocation::normalized(&raw, 0);
    assert!(transition(&state, &GameEvent::SubmitProposal { seat: 0, allocation }).is_err());

    // Duplicate proposal bounces.
    let state = apply(
        &state,
        GameEvent::SubmitProposal {
            seat: 0,
            allocation: Allocation::self_take_all(0),
        },
    );
    assert!(transition(
        &state,
        &GameEvent::SubmitProposal {
            seat: 0,
            allocation: Allocation::self_take_all(0),
        }
    )
    .is_err());

    // Voting cannot open until every active seat proposed.
    assert!(transition(&state, &GameEvent::Continue).is_err());
}

#[test]
fn voting_accepts_eliminated_voters_but_not_stray_ballot_keys() {
    let mut state = in_voting(3);
    // Simulate a prior elimination surviving into this round's voter set.
    state.eliminated.insert(2);

    // A ballot weighting a non-proposer is rejected outright.
    let stray = Ballot::normalized(&BTreeMap::from([(7u8, 100u32)]), &[7]).map(|(b, _)| b);
    let err = transition(
        &state,
        &GameEvent::SubmitVote {
            seat: 0,
            ballot: stray.unwrap(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(..)) || err.to_string().contains("ballot"));

    // The eliminated seat's ballot counts.
    let state = apply(
        &state,
        GameEvent::SubmitVote {
            seat: 2,
            ballot: ballot_for(0),
        },
    );
    assert!(state.ballots.contains_key(&2));
}

#[test]
fn end_voting_requires_every_ballot() {
    let state = in_voting(3);
    let state = apply(
        &state,
        GameEvent::SubmitVote {
            seat: 0,
            ballot: ballot_for(0),
        },
    );
    let outcome = resolve_round(state.active_count(), &state.proposals, &state.ballots)
        .unwrap_or_else(|e| panic!("resolver: {e}"));
    assert!(transition(&state, &GameEvent::EndVoting { outcome }).is_err());
}

fn vote_all(state: &crate::domain::state::GameState, pick: impl Fn(u8) -> u8) -> crate::domain::state::GameState {
    let mut state = state.clone();
    for seat in state.seat_ids() {
        state = apply(
            &state,
            GameEvent::SubmitVote {
                seat,
                ballot: ballot_for(pick(seat)),
            },
        );
    }
    state
}

#[test]
fn unanimous_vote_wins_and_ends_the_game() {
    let state = in_voting(3);
    let state = vote_all(&state, |_| 1);
    let outcome = resolve_round(state.active_count(), &state.proposals, &state.ballots)
        .unwrap_or_else(|e| panic!("resolver: {e}"));
    assert_eq!(outcome.verdict, Verdict::Winner { proposer: 1 });

    let state = apply(&state, GameEvent::EndVoting { outcome });
    assert_eq!(state.phase, Phase::Endgame);
    assert!(state.ended);
    let (winner, allocation) = state.winning_allocation.clone().unwrap();
    assert_eq!(winner, 1);
    assert_eq!(allocation.share(1), 100);
}

#[test]
fn split_vote_eliminates_and_opens_the_next_round() {
    let state = in_voting(3);
    // Everyone votes for themselves: 100 each, 33% each, nobody at 61.
    let state = vote_all(&state, |seat| seat);
    let outcome = resolve_round(state.active_count(), &state.proposals, &state.ballots)
        .unwrap_or_else(|e| panic!("resolver: {e}"));
    let Verdict::Eliminated { seat: target } = outcome.verdict else {
        panic!("expected an elimination, got {:?}", outcome.verdict);
    };
    // Equal percentages; lowest seat id goes.
    assert_eq!(target, 0);

    let state = apply(&state, GameEvent::EndVoting { outcome });
    assert_eq!(state.phase, Phase::Elimination);

    // Eliminating anyone but the verdict's seat is rejected.
    assert!(transition(&state, &GameEvent::Eliminate { seat: 1 }).is_err());
    // Continue before the elimination is committed is rejected.
    assert!(transition(&state, &GameEvent::Continue).is_err());

    let state = apply(&state, GameEvent::Eliminate { seat: target });
    assert!(state.eliminated.contains(&target));

    let state = apply(&state, GameEvent::Continue);
    assert_eq!(state.phase, Phase::Negotiation);
    assert_eq!(state.round_no, 2);
    assert!(state.proposals.is_empty());
    assert!(state.ballots.is_empty());
    assert!(state.round_outcome.is_none());
    // Everyone still speaks, eliminated seat included; order rotates.
    assert_eq!(state.speaking_order, vec![1, 2, 0]);
    assert_eq!(state.active_count(), 2);
}

#[test]
fn max_rounds_exhaustion_ends_with_no_winner() {
    let mut state = in_voting(3);
    state.max_rounds = 1;
    let state = vote_all(&state, |seat| seat);
    let outcome = resolve_round(state.active_count(), &state.proposals, &state.ballots)
        .unwrap_or_else(|e| panic!("resolver: {e}"));
    let Verdict::Eliminated { seat } = outcome.verdict else {
        panic!("expected elimination");
    };
    let state = apply(&state, GameEvent::EndVoting { outcome });
    let state = apply(&state, GameEvent::Eliminate { seat });
    let state = apply(&state, GameEvent::Continue);
    assert_eq!(state.phase, Phase::End);
    assert!(state.ended);
    assert!(state.winning_allocation.is_none());
}

#[test]
fn end_is_legal_from_any_phase() {
    for state in [
        lobby(3),
        in_strategy(3),
        in_negotiation(3),
        in_proposal(3),
        in_voting(3),
    ] {
        let ended = apply(&state, GameEvent::End);
        assert_eq!(ended.phase, Phase::End);
        assert!(ended.ended);
    }
}

#[test]
fn terminal_states_reject_further_events() {
    let state = apply(&lobby(3), GameEvent::End);
    let err = transition(&state, &GameEvent::PlayerReady { seat: 0 }).unwrap_err();
    assert!(matches!(err, DomainError::IllegalTransition { .. }));

    // A won game likewise accepts nothing further.
    let state = in_voting(2);
    let state = vote_all(&state, |_| 0);
    let outcome = resolve_round(state.active_count(), &state.proposals, &state.ballots)
        .unwrap_or_else(|e| panic!("resolver: {e}"));
    let state = apply(&state, GameEvent::EndVoting { outcome });
    assert_eq!(state.phase, Phase::Endgame);
    assert!(transition(&state, &GameEvent::Continue).is_err());
}

#[test]
fn transition_leaves_the_input_state_untouched() {
    let state = lobby(3);
    let _ = apply(&state, GameEvent::PlayerReady { seat: 0 });
    assert_eq!(state.ready_count(), 0);
}

#[test]
fn speaking_order_rotates_with_the_round() {
    use crate::domain::state::speaking_order_for_round;
    let seats = vec![0u8, 1, 2, 3];
    assert_eq!(speaking_order_for_round(&seats, 1), vec![0, 1, 2, 3]);
    assert_eq!(speaking_order_for_round(&seats, 2), vec![1, 2, 3, 0]);
    assert_eq!(speaking_order_for_round(&seats, 5), vec![0, 1, 2, 3]);
}
