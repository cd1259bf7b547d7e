use time::OffsetDateTime;
use tracing::debug;

use super::{GameFlowService, GameRuntime};
use crate::domain::{transition, GameEvent, GameSnapshot, GameState, NegotiationMessage, SeatId};
use crate::errors::domain::DomainError;
use crate::protocol::ServerMsg;
use crate::state_log::{MessageRecord, StateLogEntry};

impl GameFlowService {
    /// Commit one event: run the pure transition, replace the authoritative
    /// state, append to the state log and publish the new snapshot.
    ///
    /// On a transition error nothing is committed and nothing is published.
    pub(super) fn apply_event(
        &self,
        rt: &GameRuntime,
        state: &mut GameState,
        event: GameEvent,
    ) -> Result<(), DomainError> {
        let event_name = event.name();
        let next = transition(state, &event)?;
        *state = next;

        debug!(
            game_id = %state.game_id,
            event = event_name,
            phase = ?state.phase,
            round_no = state.round_no,
            "committed transition"
        );

        let snapshot = GameSnapshot::of(state);
        rt.state_log.append_state(StateLogEntry {
            game_id: state.game_id,
            phase: state.phase,
            round_no: state.round_no,
            snapshot: snapshot.clone(),
            at: OffsetDateTime::now_utc(),
        });

        let _ = rt.snapshots.send(snapshot.clone());
        rt.emit(ServerMsg::StateUpdate {
            game_id: state.game_id,
            snapshot,
        });
        Ok(())
    }

    /// Append one negotiation message to the transcript, log it and fan it
    /// out to subscribers. Messages are not transitions; the phase is
    /// unchanged.
    pub(super) fn record_message(
        &self,
        rt: &GameRuntime,
        state: &mut GameState,
        seat: SeatId,
        text: String,
    ) {
        let message = NegotiationMessage {
            round_no: state.round_no,
            seat,
            text,
        };
        state.transcript.push(message.clone());

        rt.state_log.append_message(MessageRecord {
            game_id: state.game_id,
            round_no: message.round_no,
            seat,
            text: message.text.clone(),
            at: OffsetDateTime::now_utc(),
        });
        rt.emit(ServerMsg::Message {
            game_id: state.game_id,
            round_no: message.round_no,
            seat,
            text: message.text,
        });
    }
}
