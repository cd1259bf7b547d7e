use std::env;
use std::time::Duration;

use crate::error::EngineError;

/// How the round verdict picks a seat to eliminate when no proposal wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EliminationMode {
    /// Default: the proposer with the lowest vote percentage leaves.
    Tally,
    /// Alternate: every seat nominates a seat directly; most-nominated
    /// active seat leaves.
    Nomination,
}

/// Per-game tunables.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Stake each seat pays up front; pool = seats * entry_fee.
    pub entry_fee: i64,
    pub max_rounds: u8,
    /// Bound on every per-seat decision request.
    pub decision_timeout: Duration,
    pub elimination_mode: EliminationMode,
    /// Base seed for fallback agents; None draws one from entropy.
    pub rng_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            entry_fee: 100,
            max_rounds: 10,
            decision_timeout: Duration::from_secs(30),
            elimination_mode: EliminationMode::Tally,
            rng_seed: None,
        }
    }
}

impl GameConfig {
    /// Build a config from environment variables, falling back to defaults.
    ///
    /// Recognized: `ENGINE_ENTRY_FEE`, `ENGINE_MAX_ROUNDS`,
    /// `ENGINE_DECISION_TIMEOUT_MS`, `ENGINE_RNG_SEED`.
    pub fn from_env() -> Result<Self, EngineError> {
        let mut cfg = Self::default();
        if let Some(fee) = parsed_var::<i64>("ENGINE_ENTRY_FEE")? {
            if fee <= 0 {
                return Err(EngineError::config(format!(
                    "ENGINE_ENTRY_FEE must be positive, got {fee}"
                )));
            }
            cfg.entry_fee = fee;
        }
        if let Some(rounds) = parsed_var::<u8>("ENGINE_MAX_ROUNDS")? {
            if rounds == 0 {
                return Err(EngineError::config("ENGINE_MAX_ROUNDS must be at least 1"));
            }
            cfg.max_rounds = rounds;
        }
        if let Some(ms) = parsed_var::<u64>("ENGINE_DECISION_TIMEOUT_MS")? {
            cfg.decision_timeout = Duration::from_millis(ms);
        }
        cfg.rng_seed = parsed_var::<u64>("ENGINE_RNG_SEED")?;
        Ok(cfg)
    }
}

fn parsed_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, EngineError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| EngineError::config(format!("{name} has invalid value '{raw}'"))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(EngineError::config(format!("{name}: {e}"))),
    }
}
