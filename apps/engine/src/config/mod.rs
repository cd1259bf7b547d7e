//! Engine configuration.

pub mod game;

pub use game::{EliminationMode, GameConfig};
