//! One full round: negotiation, proposals, voting, resolution, elimination.

use tracing::{debug, info};

use super::{GameFlowService, GameRuntime};
use crate::config::EliminationMode;
use crate::domain::{resolve_nominations, resolve_round, GameEvent, GameState, Phase, Verdict};
use crate::errors::domain::DomainError;

impl GameFlowService {
    /// Drive `state` through one negotiate/propose/vote cycle, committing
    /// every sub-step through [`apply_event`](Self::apply_event).
    ///
    /// Takes the authoritative state by `&mut`: if the caller drops this
    /// future (operator cancel), the state left behind is the last committed
    /// one, never a half-applied transition.
    pub(super) async fn run_round(
        &self,
        rt: &GameRuntime,
        state: &mut GameState,
    ) -> Result<(), DomainError> {
        debug_assert_eq!(state.phase, Phase::Negotiation);
        info!(
            game_id = %state.game_id,
            round_no = state.round_no,
            active = state.active_count(),
            "round start"
        );

        // Negotiation: strict speaking order, one turn each. Presence is
        // sampled once for the whole sub-phase.
        let presence = rt.presence.snapshot();
        for seat in state.speaking_order.clone() {
            if let Some(text) = self.collect_message(rt, &presence, state, seat).await {
                self.record_message(rt, state, seat, text);
            } else {
                debug!(game_id = %state.game_id, seat, "seat skipped its speaking turn");
            }
        }
        self.apply_event(rt, state, GameEvent::Continue)?;

        // Proposals from every active seat, concurrently.
        let proposals = self.collect_proposals(rt, state).await;
        for (seat, allocation) in proposals {
            self.apply_event(rt, state, GameEvent::SubmitProposal { seat, allocation })?;
        }
        self.apply_event(rt, state, GameEvent::Continue)?;

        // Ballots from every seat, eliminated voters included.
        let ballots = self.collect_ballots(rt, state).await;
        for (seat, ballot) in ballots {
            self.apply_event(rt, state, GameEvent::SubmitVote { seat, ballot })?;
        }

        let mut outcome = resolve_round(state.active_count(), &state.proposals, &state.ballots)?;

        // In nomination mode the tally still picks the winner, but a no-win
        // round eliminates by direct nomination instead of lowest score.
        if rt.config.elimination_mode == EliminationMode::Nomination {
            if let Verdict::Eliminated { .. } = outcome.verdict {
                let nominations = self.collect_nominations(rt, state).await;
                let target = resolve_nominations(&state.active_seats(), &nominations)?;
                outcome.verdict = Verdict::Eliminated { seat: target };
            }
        }

        let verdict = outcome.verdict;
        self.apply_event(rt, state, GameEvent::EndVoting { outcome })?;

        match verdict {
            Verdict::Winner { proposer } => {
                info!(game_id = %state.game_id, round_no = state.round_no, winner = proposer, "round produced a winner");
            }
            Verdict::Eliminated { seat } => {
                info!(game_id = %state.game_id, round_no = state.round_no, eliminated = seat, "round eliminated a seat");
                self.apply_event(rt, state, GameEvent::Eliminate { seat })?;
                self.apply_event(rt, state, GameEvent::Continue)?;
            }
        }
        Ok(())
    }
}
