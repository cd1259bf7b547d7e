//! Game flow orchestration service - bridges pure domain logic with the
//! per-game runtime (providers, presence, state log, subscribers).
//!
//! This service provides fine-grained transition methods for game state
//! progression and the round/game drivers that compose them.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};

use crate::config::GameConfig;
use crate::domain::{GameSnapshot, ProviderKind, SeatId};
use crate::presence::PresenceTable;
use crate::protocol::ServerMsg;
use crate::providers::DecisionProvider;
use crate::state_log::StateLog;

mod coordinator;
mod mutation;
mod orchestration;
pub mod player_actions;
mod round_lifecycle;
pub mod seats;

pub use orchestration::{GameCommand, GameCompletion, GameResult};

/// Game flow service - stateless; all per-game state lives in [`GameRuntime`].
#[derive(Default)]
pub struct GameFlowService;

/// Per-seat wiring: who decides for this seat, and who steps in when the
/// primary provider is absent or fails.
pub struct SeatRuntime {
    pub seat: SeatId,
    pub kind: ProviderKind,
    pub provider: Arc<dyn DecisionProvider>,
    pub fallback: Arc<dyn DecisionProvider>,
}

/// Everything the single writer task needs to drive one game.
pub struct GameRuntime {
    pub config: GameConfig,
    pub presence: Arc<PresenceTable>,
    pub seats: Vec<SeatRuntime>,
    pub state_log: Arc<dyn StateLog>,
    pub events: broadcast::Sender<ServerMsg>,
    pub snapshots: watch::Sender<GameSnapshot>,
}

impl GameRuntime {
    pub fn seat_runtime(&self, seat: SeatId) -> Option<&SeatRuntime> {
        self.seats.iter().find(|s| s.seat == seat)
    }

    /// Broadcast a server message; a send failure only means nobody is
    /// subscribed right now.
    pub(super) fn emit(&self, msg: ServerMsg) {
        let _ = self.events.send(msg);
    }
}
