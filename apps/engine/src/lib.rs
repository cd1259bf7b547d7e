#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod presence;
pub mod protocol;
pub mod providers;
pub mod services;
pub mod state_log;

// Re-exports for public API
pub use config::{EliminationMode, GameConfig};
pub use domain::{
    Allocation, Ballot, GameEvent, GameSnapshot, GameState, Phase, Settlement, SeatId,
};
pub use error::EngineError;
pub use protocol::{SeatActionMsg, ServerMsg};
pub use services::game_flow::seats::{ProviderSpec, SeatSpec};
pub use services::{GameCompletion, GameResult, GameService};
pub use state_log::{MemoryStateLog, StateLog};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    engine_test_support::logging::init();
}
