//! Channel-backed provider for human seats.
//!
//! Inbound seat actions (already phase-validated by
//! [`player_actions`](crate::services::game_flow::player_actions)) are pushed
//! into the seat's inbox; the provider resolves the matching decision request.
//! The round coordinator bounds every await with the per-seat timeout, so a
//! silent human never stalls a round.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};
use tracing::debug;

use crate::domain::state::SeatId;
use crate::providers::context::RoundContext;
use crate::providers::trait_def::{DecisionProvider, ProviderError};

/// One resolved human decision, routed from the inbound channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HumanDecision {
    Strategy(String),
    Message(String),
    Proposal(BTreeMap<SeatId, u32>),
    Ballot(BTreeMap<SeatId, u32>),
    Nomination(SeatId),
}

impl HumanDecision {
    fn kind(&self) -> &'static str {
        match self {
            HumanDecision::Strategy(_) => "strategy",
            HumanDecision::Message(_) => "message",
            HumanDecision::Proposal(_) => "proposal",
            HumanDecision::Ballot(_) => "ballot",
            HumanDecision::Nomination(_) => "nomination",
        }
    }
}

/// Decision provider that waits on a human's submissions.
pub struct HumanProvider {
    inbox: Mutex<mpsc::UnboundedReceiver<HumanDecision>>,
}

impl HumanProvider {
    /// Create the provider and the sender the service routes actions into.
    pub fn new() -> (Self, mpsc::UnboundedSender<HumanDecision>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                inbox: Mutex::new(rx),
            },
            tx,
        )
    }

    /// Wait for the next decision matching `want`, discarding stale entries
    /// left over from earlier sub-phases.
    async fn recv<T>(
        &self,
        want: &'static str,
        mut extract: impl FnMut(HumanDecision) -> Option<T> + Send,
    ) -> Result<T, ProviderError> {
        let mut inbox = self.inbox.lock().await;
        loop {
            let decision = inbox
                .recv()
                .await
                .ok_or_else(|| ProviderError::Internal("human input channel closed".into()))?;
            let kind = decision.kind();
            match extract(decision) {
                Some(value) => return Ok(value),
                None => {
                    debug!(want, got = kind, "discarding stale human decision");
                }
            }
        }
    }
}

#[async_trait]
impl DecisionProvider for HumanProvider {
    async fn strategy(&self, _ctx: &RoundContext) -> Result<String, ProviderError> {
        self.recv("strategy", |d| match d {
            HumanDecision::Strategy(s) => Some(s),
            _ => None,
        })
        .await
    }

    async fn negotiate(&self, _ctx: &RoundContext) -> Result<String, ProviderError> {
        self.recv("message", |d| match d {
            HumanDecision::Message(m) => Some(m),
            _ => None,
        })
        .await
    }

    async fn propose(&self, _ctx: &RoundContext) -> Result<BTreeMap<SeatId, u32>, ProviderError> {
        self.recv("proposal", |d| match d {
            HumanDecision::Proposal(p) => Some(p),
            _ => None,
        })
        .await
    }

    async fn vote(&self, _ctx: &RoundContext) -> Result<BTreeMap<SeatId, u32>, ProviderError> {
        self.recv("ballot", |d| match d {
            HumanDecision::Ballot(b) => Some(b),
            _ => None,
        })
        .await
    }

    async fn eliminate(&self, _ctx: &RoundContext) -> Result<SeatId, ProviderError> {
        self.recv("nomination", |d| match d {
            HumanDecision::Nomination(s) => Some(s),
            _ => None,
        })
        .await
    }
}
