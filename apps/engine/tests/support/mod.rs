//! Shared helpers for engine integration tests.

use std::time::Duration;

use engine::{EliminationMode, GameConfig, SeatSpec};

#[ctor::ctor]
fn init_logging() {
    engine_test_support::logging::init();
}

/// Config tuned for tests: tiny decision timeout so silent providers fall
/// through quickly, fixed seed for reproducibility.
pub fn fast_config(seed: u64) -> GameConfig {
    GameConfig {
        entry_fee: 100,
        max_rounds: 10,
        decision_timeout: Duration::from_millis(50),
        elimination_mode: EliminationMode::Tally,
        rng_seed: Some(seed),
    }
}

/// `n` scripted seats.
pub fn scripted_table(n: usize) -> Vec<SeatSpec> {
    (0..n).map(|i| SeatSpec::scripted(format!("bot-{i}"))).collect()
}
