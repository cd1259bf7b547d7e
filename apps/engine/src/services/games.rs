//! Game registry: creation, action routing and observation for many
//! concurrently running games.
//!
//! Each created game gets one spawned writer task (see
//! [`orchestration`](super::game_flow)); this service holds the handles and
//! translates outside calls into channel traffic, so no lock is ever held
//! across a game's state mutation.

use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::DashMap;
use rand::Rng;
use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

use crate::config::GameConfig;
use crate::domain::{GameSnapshot, GameState, SeatId, MIN_SEATS};
use crate::error::EngineError;
use crate::errors::domain::DomainError;
use crate::presence::PresenceTable;
use crate::protocol::{SeatActionMsg, ServerMsg};
use crate::providers::{DecisionRequest, HumanDecision};
use crate::services::game_flow::player_actions::{route_action, RoutedAction};
use crate::services::game_flow::seats::{wire_seats, SeatSpec};
use crate::services::game_flow::{
    GameCommand, GameCompletion, GameFlowService, GameRuntime,
};
use crate::state_log::StateLog;

/// Broadcast buffer per game; slow subscribers lag, the writer never blocks.
const EVENT_BUFFER: usize = 256;

/// Handles the service keeps per live game.
struct GameHandle {
    cmd_tx: mpsc::UnboundedSender<GameCommand>,
    cancel: CancellationToken,
    snapshots: watch::Receiver<GameSnapshot>,
    events: broadcast::Sender<ServerMsg>,
    actions: BTreeMap<SeatId, mpsc::UnboundedSender<HumanDecision>>,
    presence: Arc<PresenceTable>,
    completion: watch::Receiver<Option<GameCompletion>>,
}

/// What `create_game` hands back to the caller.
#[derive(Debug)]
pub struct CreatedGame {
    pub game_id: Uuid,
    /// Request channels for external-provider seats; the caller must serve
    /// these or the seats fall back to their scripted stand-ins.
    pub external_inboxes: BTreeMap<SeatId, mpsc::Receiver<DecisionRequest>>,
}

/// Multi-game front door.
pub struct GameService {
    state_log: Arc<dyn StateLog>,
    games: DashMap<Uuid, GameHandle>,
}

impl GameService {
    pub fn new(state_log: Arc<dyn StateLog>) -> Self {
        Self {
            state_log,
            games: DashMap::new(),
        }
    }

    /// Create a game, wire its seats and spawn its writer task.
    pub fn create_game(
        &self,
        config: GameConfig,
        seats: &[SeatSpec],
    ) -> Result<CreatedGame, EngineError> {
        if seats.len() < MIN_SEATS {
            return Err(DomainError::validation(format!(
                "a game needs at least {MIN_SEATS} seats, got {}",
                seats.len()
            ))
            .into());
        }

        let game_id = Uuid::new_v4();
        let mut state = GameState::new(game_id, config.max_rounds);
        let game_seed = config.rng_seed.unwrap_or_else(|| rand::rng().random());
        let wired = wire_seats(&mut state, seats, game_seed)?;

        let presence = Arc::new(PresenceTable::new(state.seat_ids()));
        let (events_tx, _) = broadcast::channel(EVENT_BUFFER);
        let (snap_tx, snap_rx) = watch::channel(GameSnapshot::of(&state));
        let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel();
        let (done_tx, done_rx) = watch::channel(None);
        let cancel = CancellationToken::new();

        let runtime = GameRuntime {
            config,
            presence: Arc::clone(&presence),
            seats: wired.seats,
            state_log: Arc::clone(&self.state_log),
            events: events_tx.clone(),
            snapshots: snap_tx,
        };

        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            let flow = GameFlowService;
            let completion = flow
                .run_game(&runtime, state, &mut cmd_rx, task_cancel)
                .await;
            info!(game_id = %game_id, result = ?completion.result, "game task finished");
            let _ = done_tx.send(Some(completion));
        });

        self.games.insert(
            game_id,
            GameHandle {
                cmd_tx,
                cancel,
                snapshots: snap_rx,
                events: events_tx,
                actions: wired.action_txs,
                presence,
                completion: done_rx,
            },
        );

        info!(game_id = %game_id, seats = seats.len(), "game created");
        Ok(CreatedGame {
            game_id,
            external_inboxes: wired.external_rxs,
        })
    }

    fn with_handle<T>(
        &self,
        game_id: Uuid,
        f: impl FnOnce(&GameHandle) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        match self.games.get(&game_id) {
            Some(handle) => f(&handle),
            None => Err(EngineError::GameNotFound(game_id)),
        }
    }

    /// Validate and route one seat action against the latest published
    /// snapshot. Actions from non-human seats have no inbox and bounce.
    pub fn submit_action(
        &self,
        game_id: Uuid,
        seat: SeatId,
        action: SeatActionMsg,
    ) -> Result<(), EngineError> {
        self.with_handle(game_id, |handle| {
            let snapshot = handle.snapshots.borrow().clone();
            match route_action(&snapshot, seat, action)? {
                RoutedAction::Ready => handle
                    .cmd_tx
                    .send(GameCommand::Ready { seat })
                    .map_err(|_| EngineError::GameEnded(game_id)),
                RoutedAction::Decision(decision) => {
                    let tx = handle.actions.get(&seat).ok_or_else(|| {
                        DomainError::validation(format!("seat {seat} is not human-controlled"))
                    })?;
                    tx.send(decision)
                        .map_err(|_| EngineError::GameEnded(game_id))
                }
            }
        })
    }

    /// Force a lobby start without waiting for every ready flag.
    pub fn start_game(&self, game_id: Uuid) -> Result<(), EngineError> {
        self.with_handle(game_id, |handle| {
            handle
                .cmd_tx
                .send(GameCommand::Start)
                .map_err(|_| EngineError::GameEnded(game_id))
        })
    }

    /// Operator cancel; takes effect at the game task's next commit point.
    pub fn end_game(&self, game_id: Uuid) -> Result<(), EngineError> {
        self.with_handle(game_id, |handle| {
            handle.cancel.cancel();
            Ok(())
        })
    }

    /// Mark a seat's transport as connected or gone. Affects which provider
    /// resolves the seat's next decisions; the game itself never pauses.
    pub fn set_connected(
        &self,
        game_id: Uuid,
        seat: SeatId,
        connected: bool,
    ) -> Result<(), EngineError> {
        self.with_handle(game_id, |handle| {
            if connected {
                handle.presence.mark_connected(seat);
            } else {
                handle.presence.mark_disconnected(seat);
            }
            let _ = handle.events.send(ServerMsg::Presence {
                game_id,
                seat,
                connected,
            });
            Ok(())
        })
    }

    /// Subscribe to the game's event broadcast.
    pub fn subscribe(&self, game_id: Uuid) -> Result<broadcast::Receiver<ServerMsg>, EngineError> {
        self.with_handle(game_id, |handle| Ok(handle.events.subscribe()))
    }

    /// Latest published snapshot.
    pub fn snapshot(&self, game_id: Uuid) -> Result<GameSnapshot, EngineError> {
        self.with_handle(game_id, |handle| Ok(handle.snapshots.borrow().clone()))
    }

    /// Wait until the game task publishes its completion.
    pub async fn wait_completion(&self, game_id: Uuid) -> Result<GameCompletion, EngineError> {
        // Clone the receiver so no registry entry is held across the await.
        let mut rx = self.with_handle(game_id, |handle| Ok(handle.completion.clone()))?;
        let completion = rx
            .wait_for(|done| done.is_some())
            .await
            .map_err(|_| EngineError::channel_closed("game task dropped its completion slot"))?;
        completion
            .clone()
            .ok_or_else(|| EngineError::internal("completion slot emptied after being set"))
    }

    /// Drop a finished game's handle. Logged history stays in the state log.
    pub fn remove_game(&self, game_id: Uuid) -> Result<(), EngineError> {
        match self.games.remove(&game_id) {
            Some(_) => Ok(()),
            None => Err(EngineError::GameNotFound(game_id)),
        }
    }
}
