//! Adapter for out-of-process decision generators.
//!
//! The engine does not know how external decisions are produced (an LLM, a
//! remote service, a tournament harness); it only speaks a request/response
//! channel pair. Each call sends a [`DecisionRequest`] carrying a one-shot
//! reply slot and awaits the answer under the coordinator's timeout.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::domain::state::SeatId;
use crate::providers::context::RoundContext;
use crate::providers::trait_def::{DecisionProvider, ProviderError};

/// What kind of decision is being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionKind {
    Strategy,
    Negotiate,
    Propose,
    Vote,
    Eliminate,
}

impl DecisionKind {
    pub fn name(&self) -> &'static str {
        match self {
            DecisionKind::Strategy => "strategy",
            DecisionKind::Negotiate => "message",
            DecisionKind::Propose => "proposal",
            DecisionKind::Vote => "ballot",
            DecisionKind::Eliminate => "nomination",
        }
    }
}

/// Answer from the external generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionResponse {
    Text(String),
    Shares(BTreeMap<SeatId, u32>),
    Seat(SeatId),
}

/// One outstanding request to the external generator.
#[derive(Debug)]
pub struct DecisionRequest {
    pub kind: DecisionKind,
    pub ctx: RoundContext,
    pub reply: oneshot::Sender<DecisionResponse>,
}

/// Provider backed by an external request/response channel.
pub struct ExternalAgent {
    tx: mpsc::Sender<DecisionRequest>,
}

impl ExternalAgent {
    pub const NAME: &'static str = "ExternalAgent";
    pub const VERSION: &'static str = "1.0.0";

    /// Create the agent plus the receiver the external generator serves.
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<DecisionRequest>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { tx }, rx)
    }

    async fn request(
        &self,
        kind: DecisionKind,
        ctx: &RoundContext,
    ) -> Result<DecisionResponse, ProviderError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(DecisionRequest {
                kind,
                ctx: ctx.clone(),
                reply,
            })
            .await
            .map_err(|_| ProviderError::Internal("external generator gone".into()))?;
        rx.await
            .map_err(|_| ProviderError::Internal("external generator dropped the reply".into()))
    }
}

#[async_trait]
impl DecisionProvider for ExternalAgent {
    async fn strategy(&self, ctx: &RoundContext) -> Result<String, ProviderError> {
        match self.request(DecisionKind::Strategy, ctx).await? {
            DecisionResponse::Text(t) => Ok(t),
            other => Err(ProviderError::InvalidDecision(format!(
                "expected text strategy, got {other:?}"
            ))),
        }
    }

    async fn negotiate(&self, ctx: &RoundContext) -> Result<String, ProviderError> {
        match self.request(DecisionKind::Negotiate, ctx).await? {
            DecisionResponse::Text(t) => Ok(t),
            other => Err(ProviderError::InvalidDecision(format!(
                "expected text message, got {other:?}"
            ))),
        }
    }

    async fn propose(&self, ctx: &RoundContext) -> Result<BTreeMap<SeatId, u32>, ProviderError> {
        match self.request(DecisionKind::Propose, ctx).await? {
            DecisionResponse::Shares(s) => Ok(s),
            other => Err(ProviderError::InvalidDecision(format!(
                "expected allocation shares, got {other:?}"
            ))),
        }
    }

    async fn vote(&self, ctx: &RoundContext) -> Result<BTreeMap<SeatId, u32>, ProviderError> {
        match self.request(DecisionKind::Vote, ctx).await? {
            DecisionResponse::Shares(s) => Ok(s),
            other => Err(ProviderError::InvalidDecision(format!(
                "expected ballot shares, got {other:?}"
            ))),
        }
    }

    async fn eliminate(&self, ctx: &RoundContext) -> Result<SeatId, ProviderError> {
        match self.request(DecisionKind::Eliminate, ctx).await? {
            DecisionResponse::Seat(s) => Ok(s),
            other => Err(ProviderError::InvalidDecision(format!(
                "expected seat nomination, got {other:?}"
            ))),
        }
    }
}
