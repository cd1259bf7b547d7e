//! Outbound/inbound event contract for the real-time channel.
//!
//! The engine does not own a transport; it broadcasts `ServerMsg` values and
//! accepts `SeatActionMsg` submissions, which are validated against the
//! current phase before acceptance (see
//! [`player_actions`](crate::services::game_flow::player_actions)).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::settlement::Settlement;
use crate::domain::snapshot::GameSnapshot;
use crate::domain::state::SeatId;

/// Events the engine pushes outward.
#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    StateUpdate {
        game_id: Uuid,
        snapshot: GameSnapshot,
    },

    Message {
        game_id: Uuid,
        round_no: u8,
        seat: SeatId,
        text: String,
    },

    Presence {
        game_id: Uuid,
        seat: SeatId,
        connected: bool,
    },

    GameOver {
        game_id: Uuid,
        winner: Option<SeatId>,
        settlement: Option<Settlement>,
    },

    Error {
        code: String,
        message: String,
    },
}

/// Inbound seat-action submissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SeatActionMsg {
    Ready,
    SubmitStrategy { strategy: String },
    SendMessage { text: String },
    SubmitProposal { allocation: BTreeMap<SeatId, u32> },
    SubmitBallot { ballot: BTreeMap<SeatId, u32> },
    NominateElimination { seat: SeatId },
}

impl SeatActionMsg {
    pub fn name(&self) -> &'static str {
        match self {
            SeatActionMsg::Ready => "ready",
            SeatActionMsg::SubmitStrategy { .. } => "submit_strategy",
            SeatActionMsg::SendMessage { .. } => "send_message",
            SeatActionMsg::SubmitProposal { .. } => "submit_proposal",
            SeatActionMsg::SubmitBallot { .. } => "submit_ballot",
            SeatActionMsg::NominateElimination { .. } => "nominate_elimination",
        }
    }
}
