//! Whole-game driver: lobby, strategy phase, round loop, settlement.
//!
//! One spawned task per game owns the authoritative [`GameState`] and is the
//! only writer; everything outside observes through the snapshot watch and
//! the event broadcast.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::{GameFlowService, GameRuntime};
use crate::domain::{settle, GameEvent, GameState, Phase, ProviderKind, SeatId, Settlement};
use crate::protocol::ServerMsg;

/// Lobby-scope commands routed from the service into the game task.
#[derive(Debug, Clone, Copy)]
pub enum GameCommand {
    Ready { seat: SeatId },
    Start,
}

/// Terminal outcome of one game task.
#[derive(Debug, Clone)]
pub enum GameResult {
    /// A proposal won; settlement executed.
    Winner {
        seat: SeatId,
        settlement: Settlement,
    },
    /// The round budget ran out with no supermajority.
    NoWinner,
    /// Operator cancel before a natural ending.
    Cancelled,
    /// An internal invariant broke; the game stopped without settling.
    Faulted { reason: String },
}

/// Final state plus outcome, published once when the game task exits.
#[derive(Debug, Clone)]
pub struct GameCompletion {
    pub state: GameState,
    pub result: GameResult,
}

impl GameFlowService {
    /// Drive one game from lobby to completion. This is the single writer:
    /// every state mutation in the game's life happens on this task.
    pub async fn run_game(
        &self,
        rt: &GameRuntime,
        mut state: GameState,
        cmds: &mut mpsc::UnboundedReceiver<GameCommand>,
        cancel: CancellationToken,
    ) -> GameCompletion {
        // Autonomous seats do not wait in lobbies.
        for seat in state.seats.clone() {
            if seat.kind != ProviderKind::Human {
                if let Err(err) =
                    self.apply_event(rt, &mut state, GameEvent::PlayerReady { seat: seat.id })
                {
                    warn!(game_id = %state.game_id, seat = seat.id, %err, "auto-ready failed");
                }
            }
        }
        if state.ready_count() == state.seats.len() {
            if let Err(err) = self.apply_event(rt, &mut state, GameEvent::StartGame) {
                return self.fault(rt, state, err.to_string());
            }
        }

        while state.phase == Phase::Lobby {
            let mut cancelled = false;
            let mut command = None;
            tokio::select! {
                biased;
                _ = cancel.cancelled() => cancelled = true,
                cmd = cmds.recv() => match cmd {
                    Some(cmd) => command = Some(cmd),
                    // The handle is gone; nobody can ever start this game.
                    None => cancelled = true,
                },
            }
            if cancelled {
                return self.cancel_game(rt, state);
            }
            match command {
                Some(GameCommand::Ready { seat }) => {
                    if let Err(err) =
                        self.apply_event(rt, &mut state, GameEvent::PlayerReady { seat })
                    {
                        warn!(game_id = %state.game_id, seat, %err, "ready rejected");
                        rt.emit(ServerMsg::Error {
                            code: err.code().as_str().to_string(),
                            message: err.to_string(),
                        });
                        continue;
                    }
                    if state.ready_count() == state.seats.len() {
                        if let Err(err) = self.apply_event(rt, &mut state, GameEvent::StartGame) {
                            return self.fault(rt, state, err.to_string());
                        }
                    }
                }
                Some(GameCommand::Start) => {
                    if let Err(err) = self.apply_event(rt, &mut state, GameEvent::StartGame) {
                        warn!(game_id = %state.game_id, %err, "start rejected");
                        rt.emit(ServerMsg::Error {
                            code: err.code().as_str().to_string(),
                            message: err.to_string(),
                        });
                    }
                }
                None => {}
            }
        }

        // Strategy phase: collect from everyone, then open round one.
        let strategies = self.collect_strategies(rt, &state).await;
        for (seat, strategy) in strategies {
            if let Err(err) =
                self.apply_event(rt, &mut state, GameEvent::SubmitStrategy { seat, strategy })
            {
                return self.fault(rt, state, err.to_string());
            }
        }
        if let Err(err) = self.apply_event(rt, &mut state, GameEvent::AllStrategiesSubmitted) {
            return self.fault(rt, state, err.to_string());
        }

        // Round loop. A cancel mid-round drops the round future at an await
        // point; the state holds the last committed transition, so the End
        // event that follows is always legal.
        while !state.ended {
            let mut cancelled = false;
            let mut round_result = Ok(());
            tokio::select! {
                biased;
                _ = cancel.cancelled() => cancelled = true,
                res = self.run_round(rt, &mut state) => round_result = res,
            }
            if cancelled {
                return self.cancel_game(rt, state);
            }
            if let Err(err) = round_result {
                return self.fault(rt, state, err.to_string());
            }
        }

        self.finish_game(rt, state)
    }

    /// Commit the operator cancel and close out with no winner.
    fn cancel_game(&self, rt: &GameRuntime, mut state: GameState) -> GameCompletion {
        if let Err(err) = self.apply_event(rt, &mut state, GameEvent::End) {
            // End is legal from every phase; failing here is a bug, but the
            // game is over either way.
            error!(game_id = %state.game_id, %err, "cancel commit failed");
        }
        info!(game_id = %state.game_id, "game cancelled");
        rt.emit(ServerMsg::GameOver {
            game_id: state.game_id,
            winner: None,
            settlement: None,
        });
        GameCompletion {
            state,
            result: GameResult::Cancelled,
        }
    }

    /// Close out a broken game without settling.
    fn fault(&self, rt: &GameRuntime, state: GameState, reason: String) -> GameCompletion {
        error!(game_id = %state.game_id, %reason, "game faulted");
        rt.emit(ServerMsg::Error {
            code: crate::errors::ErrorCode::InternalError.as_str().to_string(),
            message: reason.clone(),
        });
        rt.emit(ServerMsg::GameOver {
            game_id: state.game_id,
            winner: None,
            settlement: None,
        });
        GameCompletion {
            state,
            result: GameResult::Faulted { reason },
        }
    }

    /// The round loop ended naturally: settle a win, or report the budget
    /// running out.
    fn finish_game(&self, rt: &GameRuntime, state: GameState) -> GameCompletion {
        match state.phase {
            Phase::Endgame => {
                let Some((winner, allocation)) = state.winning_allocation.clone() else {
                    return self.fault(rt, state, "endgame with no winning allocation".into());
                };
                match settle(&state.seat_ids(), &allocation, rt.config.entry_fee) {
                    Ok(settlement) => {
                        info!(
                            game_id = %state.game_id,
                            winner,
                            pool = settlement.pool,
                            net = settlement.net,
                            "settled"
                        );
                        rt.emit(ServerMsg::GameOver {
                            game_id: state.game_id,
                            winner: Some(winner),
                            settlement: Some(settlement.clone()),
                        });
                        GameCompletion {
                            state,
                            result: GameResult::Winner {
                                seat: winner,
                                settlement,
                            },
                        }
                    }
                    // The economic invariant failed: withhold the result
                    // entirely rather than pay out a broken split.
                    Err(err) => self.fault(rt, state, err.to_string()),
                }
            }
            Phase::End => {
                info!(game_id = %state.game_id, "round budget exhausted, no winner");
                rt.emit(ServerMsg::GameOver {
                    game_id: state.game_id,
                    winner: None,
                    settlement: None,
                });
                GameCompletion {
                    state,
                    result: GameResult::NoWinner,
                }
            }
            other => self.fault(rt, state, format!("game ended in unexpected phase {other:?}")),
        }
    }
}
