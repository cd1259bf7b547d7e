//! Service layer: game orchestration and the multi-game registry.

pub mod game_flow;
pub mod games;

pub use game_flow::{GameCompletion, GameFlowService, GameResult};
pub use games::{CreatedGame, GameService};
