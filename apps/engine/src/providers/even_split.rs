//! Baseline agent that always plays the egalitarian line.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::allocation::SHARE_SUM;
use crate::domain::state::SeatId;
use crate::providers::context::RoundContext;
use crate::providers::trait_def::{DecisionProvider, ProviderError};

/// Proposes an even split of the pool and votes evenly across proposals.
/// Useful as a neutral baseline in tests and mixed fields.
pub struct EvenSplitAgent;

impl EvenSplitAgent {
    pub const NAME: &'static str = "EvenSplitAgent";
    pub const VERSION: &'static str = "1.0.0";

    pub fn new() -> Self {
        Self
    }
}

impl Default for EvenSplitAgent {
    fn default() -> Self {
        Self::new()
    }
}

fn even_over(keys: &[SeatId]) -> Result<BTreeMap<SeatId, u32>, ProviderError> {
    if keys.is_empty() {
        return Err(ProviderError::InvalidDecision("nothing to split over".into()));
    }
    let base = SHARE_SUM / keys.len() as u32;
    let mut shares: BTreeMap<SeatId, u32> = keys.iter().map(|&k| (k, base)).collect();
    let remainder = SHARE_SUM - base * keys.len() as u32;
    if let Some(first) = keys.iter().min() {
        *shares.entry(*first).or_insert(0) += remainder;
    }
    Ok(shares)
}

#[async_trait]
impl DecisionProvider for EvenSplitAgent {
    async fn strategy(&self, _ctx: &RoundContext) -> Result<String, ProviderError> {
        Ok("Propose an even split and vote without favorites.".to_string())
    }

    async fn negotiate(&self, _ctx: &RoundContext) -> Result<String, ProviderError> {
        Ok("An even split among the remaining seats is the only stable deal.".to_string())
    }

    async fn propose(&self, ctx: &RoundContext) -> Result<BTreeMap<SeatId, u32>, ProviderError> {
        even_over(&ctx.active_seats)
    }

    async fn vote(&self, ctx: &RoundContext) -> Result<BTreeMap<SeatId, u32>, ProviderError> {
        let proposers: Vec<SeatId> = ctx.proposals.keys().copied().collect();
        even_over(&proposers)
    }

    async fn eliminate(&self, ctx: &RoundContext) -> Result<SeatId, ProviderError> {
        // No preference: nominate the lowest rival id.
        ctx.rivals()
            .into_iter()
            .min()
            .ok_or_else(|| ProviderError::InvalidDecision("no rival to nominate".into()))
    }
}
