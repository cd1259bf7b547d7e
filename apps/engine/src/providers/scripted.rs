//! Scripted rule-based agent - the reference autonomous provider.
//!
//! `ScriptedAgent` plays a simple self-interested line: it keeps a
//! configurable slice of the pool for itself, spreads the rest evenly, and
//! weights its ballot by how much each proposal pays it. It is seedable so
//! tests and fallback behavior are reproducible, which is why the round
//! coordinator also uses it as the autonomous fallback for absent seats.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::domain::allocation::SHARE_SUM;
use crate::domain::state::SeatId;
use crate::providers::context::RoundContext;
use crate::providers::trait_def::{DecisionProvider, ProviderError};

const NEGOTIATION_LINES: &[&str] = &[
    "I want a fair deal for everyone still at the table.",
    "Back my split this round and I will remember it next round.",
    "The lowest proposal gets eliminated; think about whose that is.",
    "I am fine going to a runoff if nobody moves.",
    "An even split never clears the threshold. Someone has to give.",
];

/// Self-interested scripted agent.
///
/// Deterministic for a given seed: the RNG sits behind a `Mutex` because
/// trait methods take `&self` but the RNG needs mutable access. ChaCha keeps
/// seeded behavior stable across `rand` upgrades.
pub struct ScriptedAgent {
    rng: Mutex<ChaCha8Rng>,
    /// Extra share of the pool (in percent points above an even split) the
    /// agent tries to keep for itself.
    greed: u32,
}

impl ScriptedAgent {
    pub const NAME: &'static str = "ScriptedAgent";
    pub const VERSION: &'static str = "1.0.0";

    /// Default greed: points above an even split kept for self.
    pub const DEFAULT_GREED: u32 = 15;

    pub fn new(seed: Option<u64>) -> Self {
        Self::with_greed(seed, Self::DEFAULT_GREED)
    }

    pub fn with_greed(seed: Option<u64>, greed: u32) -> Self {
        let rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
            greed: greed.min(SHARE_SUM),
        }
    }

    fn lock_rng(&self) -> Result<std::sync::MutexGuard<'_, ChaCha8Rng>, ProviderError> {
        self.rng
            .lock()
            .map_err(|e| ProviderError::Internal(format!("RNG lock poisoned: {e}")))
    }
}

#[async_trait]
impl DecisionProvider for ScriptedAgent {
    async fn strategy(&self, _ctx: &RoundContext) -> Result<String, ProviderError> {
        Ok(format!(
            "Keep roughly {} points above an even split; vote for whichever proposal pays me most.",
            self.greed
        ))
    }

    async fn negotiate(&self, ctx: &RoundContext) -> Result<String, ProviderError> {
        let mut rng = self.lock_rng()?;
        let line = NEGOTIATION_LINES
            .choose(&mut *rng)
            .copied()
            .ok_or_else(|| ProviderError::Internal("no negotiation lines".into()))?;
        Ok(format!("[round {}] {line}", ctx.round_no))
    }

    async fn propose(&self, ctx: &RoundContext) -> Result<BTreeMap<SeatId, u32>, ProviderError> {
        let active = &ctx.active_seats;
        if active.is_empty() {
            return Err(ProviderError::InvalidDecision("no active seats".into()));
        }

        let even = SHARE_SUM / active.len() as u32;
        let jitter = {
            let mut rng = self.lock_rng()?;
            rng.random_range(0..=5)
        };
        let keep = (even + self.greed + jitter).min(SHARE_SUM);

        let mut shares = BTreeMap::new();
        let rivals = ctx.rivals();
        if rivals.is_empty() {
            shares.insert(ctx.seat, SHARE_SUM);
            return Ok(shares);
        }
        let rest = SHARE_SUM - keep;
        let each = rest / rivals.len() as u32;
        for &rival in &rivals {
            shares.insert(rival, each);
        }
        // Remainder stays with the proposer so the map sums to exactly 100.
        shares.insert(ctx.seat, keep + (rest - each * rivals.len() as u32));
        Ok(shares)
    }

    async fn vote(&self, ctx: &RoundContext) -> Result<BTreeMap<SeatId, u32>, ProviderError> {
        if ctx.proposals.is_empty() {
            return Err(ProviderError::InvalidDecision("no proposals to vote on".into()));
        }

        // Weight each proposal by what it pays this seat, plus one so a
        // proposal that pays nothing still gets a nonzero base weight.
        let scores: BTreeMap<SeatId, u32> = ctx
            .proposals
            .iter()
            .map(|(&proposer, allocation)| (proposer, allocation.share(ctx.seat) + 1))
            .collect();

        let total: u32 = scores.values().sum();
        let mut ballot = BTreeMap::new();
        let mut assigned = 0;
        for (&proposer, &score) in &scores {
            let weight = score * SHARE_SUM / total;
            assigned += weight;
            ballot.insert(proposer, weight);
        }
        // Remainder goes to the best-paying proposal (lowest id on ties).
        let best = scores
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
            .map(|(&p, _)| p)
            .ok_or_else(|| ProviderError::Internal("empty ballot scores".into()))?;
        *ballot.entry(best).or_insert(0) += SHARE_SUM - assigned;
        Ok(ballot)
    }

    async fn eliminate(&self, ctx: &RoundContext) -> Result<SeatId, ProviderError> {
        // Nominate the rival whose proposal pays this seat the least.
        let rivals = ctx.rivals();
        let target = rivals
            .iter()
            .min_by_key(|&&rival| {
                ctx.proposals
                    .get(&rival)
                    .map(|a| a.share(ctx.seat))
                    .unwrap_or(0)
            })
            .copied();
        target.ok_or_else(|| ProviderError::InvalidDecision("no rival to nominate".into()))
    }
}
