//! Decision provider trait definition.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;

use crate::domain::state::SeatId;
use crate::providers::context::RoundContext;

/// Errors that can occur while a provider makes a decision.
#[derive(Debug)]
pub enum ProviderError {
    /// Provider failed to decide within the timeout
    Timeout,
    /// Provider encountered an internal error
    Internal(String),
    /// Provider produced output the engine could not use
    InvalidDecision(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Timeout => write!(f, "decision timeout"),
            ProviderError::Internal(msg) => write!(f, "provider internal error: {msg}"),
            ProviderError::InvalidDecision(msg) => write!(f, "invalid decision: {msg}"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Pluggable per-seat decision capability.
///
/// All calls are advisory: a failure or malformed result is replaced by the
/// round coordinator with a per-decision-type default and is never fatal for
/// the game. Raw share maps are returned as submitted; normalization happens
/// in the engine.
#[async_trait]
pub trait DecisionProvider: Send + Sync {
    /// Produce the seat's private strategy text for the game.
    async fn strategy(&self, ctx: &RoundContext) -> Result<String, ProviderError>;

    /// Produce one negotiation message for the current round.
    async fn negotiate(&self, ctx: &RoundContext) -> Result<String, ProviderError>;

    /// Produce an allocation proposal (seat id -> percentage).
    async fn propose(&self, ctx: &RoundContext) -> Result<BTreeMap<SeatId, u32>, ProviderError>;

    /// Produce a ballot (proposer id -> voting weight).
    async fn vote(&self, ctx: &RoundContext) -> Result<BTreeMap<SeatId, u32>, ProviderError>;

    /// Nominate a seat for elimination (direct-nomination mode only).
    async fn eliminate(&self, ctx: &RoundContext) -> Result<SeatId, ProviderError>;
}
