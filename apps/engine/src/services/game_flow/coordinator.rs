//! Decision collection: resolves each seat's decision through its provider
//! chain and substitutes per-decision-type defaults so a silent or broken
//! provider can never stall the game.

use std::collections::BTreeMap;

use futures::future::join_all;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::{GameFlowService, GameRuntime};
use crate::domain::{Allocation, Ballot, GameState, ProviderKind, SeatId};
use crate::errors::domain::DomainError;
use crate::presence::PresenceSnapshot;
use crate::providers::{
    DecisionKind, DecisionProvider, DecisionResponse, ProviderError, RoundContext,
};

/// Strategy recorded for a seat whose provider produced nothing.
pub(super) const FALLBACK_STRATEGY: &str = "Take the best deal on the table.";

/// Dispatch one request to a provider and box the answer in the common
/// response shape.
async fn request(
    provider: &dyn DecisionProvider,
    kind: DecisionKind,
    ctx: &RoundContext,
) -> Result<DecisionResponse, ProviderError> {
    match kind {
        DecisionKind::Strategy => provider.strategy(ctx).await.map(DecisionResponse::Text),
        DecisionKind::Negotiate => provider.negotiate(ctx).await.map(DecisionResponse::Text),
        DecisionKind::Propose => provider.propose(ctx).await.map(DecisionResponse::Shares),
        DecisionKind::Vote => provider.vote(ctx).await.map(DecisionResponse::Shares),
        DecisionKind::Eliminate => provider.eliminate(ctx).await.map(DecisionResponse::Seat),
    }
}

impl GameFlowService {
    /// Resolve one decision for one seat.
    ///
    /// Presence was sampled once at the start of the sub-phase: a connected
    /// seat goes through its primary provider with the fallback as second
    /// try; an absent seat resolves through its fallback, requested right
    /// away. An absent human seat's inbox stays in the race for the whole
    /// window, so a player who reconnects and submits before the sub-phase
    /// closes supersedes the fallback answer. Each attempt is bounded by the
    /// configured decision timeout. `None` means every attempt failed and
    /// the caller should substitute the decision-type default.
    pub(super) async fn resolve_decision(
        &self,
        rt: &GameRuntime,
        presence: &PresenceSnapshot,
        seat: SeatId,
        kind: DecisionKind,
        ctx: &RoundContext,
    ) -> Option<DecisionResponse> {
        let runtime = match rt.seat_runtime(seat) {
            Some(r) => r,
            None => {
                warn!(game_id = %ctx.game_id, seat, "no provider wired for seat");
                return None;
            }
        };

        if !presence.is_connected(seat) && runtime.kind == ProviderKind::Human {
            debug!(
                game_id = %ctx.game_id,
                seat,
                ?kind,
                "seat absent, fallback requested; a reconnect submission supersedes it"
            );
            let window = rt.config.decision_timeout;
            let (primary, fallback) = tokio::join!(
                timeout(window, request(runtime.provider.as_ref(), kind, ctx)),
                timeout(window, request(runtime.fallback.as_ref(), kind, ctx)),
            );
            // The human answer wins whenever it arrived inside the window.
            for outcome in [primary, fallback] {
                match outcome {
                    Ok(Ok(response)) => return Some(response),
                    Ok(Err(err)) => {
                        let err = DomainError::provider_failure(seat, err.to_string());
                        warn!(game_id = %ctx.game_id, seat, ?kind, %err, "provider failed");
                    }
                    Err(_) => {
                        let err = DomainError::missing(seat, kind.name());
                        debug!(game_id = %ctx.game_id, seat, ?kind, %err, "no reconnect submission");
                    }
                }
            }
            return None;
        }

        let providers: Vec<&dyn DecisionProvider> = if presence.is_connected(seat) {
            vec![runtime.provider.as_ref(), runtime.fallback.as_ref()]
        } else {
            debug!(game_id = %ctx.game_id, seat, ?kind, "seat absent, using fallback provider");
            vec![runtime.fallback.as_ref()]
        };

        for provider in providers {
            match timeout(rt.config.decision_timeout, request(provider, kind, ctx)).await {
                Ok(Ok(response)) => return Some(response),
                Ok(Err(err)) => {
                    let err = DomainError::provider_failure(seat, err.to_string());
                    warn!(game_id = %ctx.game_id, seat, ?kind, %err, "provider failed");
                }
                Err(_) => {
                    let err = DomainError::missing(seat, kind.name());
                    warn!(game_id = %ctx.game_id, seat, ?kind, %err, "provider timed out");
                }
            }
        }
        None
    }

    /// Collect a private strategy from every seat; silent seats get the
    /// stock fallback text so the phase always completes.
    pub(super) async fn collect_strategies(
        &self,
        rt: &GameRuntime,
        state: &GameState,
    ) -> BTreeMap<SeatId, String> {
        let presence = rt.presence.snapshot();
        let futures = state.seat_ids().into_iter().map(|seat| {
            let presence = &presence;
            async move {
                let ctx = RoundContext::for_seat(state, seat, rt.config.entry_fee);
                let text = match self
                    .resolve_decision(rt, presence, seat, DecisionKind::Strategy, &ctx)
                    .await
                {
                    Some(DecisionResponse::Text(t)) if !t.trim().is_empty() => t,
                    _ => FALLBACK_STRATEGY.to_string(),
                };
                (seat, text)
            }
        });
        join_all(futures).await.into_iter().collect()
    }

    /// One negotiation message for `seat`, or None if the seat has nothing
    /// to say (a skipped turn is legal; the speaking order moves on).
    pub(super) async fn collect_message(
        &self,
        rt: &GameRuntime,
        presence: &PresenceSnapshot,
        state: &GameState,
        seat: SeatId,
    ) -> Option<String> {
        let ctx = RoundContext::for_seat(state, seat, rt.config.entry_fee);
        match self
            .resolve_decision(rt, presence, seat, DecisionKind::Negotiate, &ctx)
            .await
        {
            Some(DecisionResponse::Text(t)) if !t.trim().is_empty() => Some(t),
            _ => None,
        }
    }

    /// Concurrently collect one proposal per active seat. Raw maps are
    /// filtered to known seats and normalized; a seat that produces nothing
    /// usable falls back to keeping the whole pool.
    pub(super) async fn collect_proposals(
        &self,
        rt: &GameRuntime,
        state: &GameState,
    ) -> BTreeMap<SeatId, Allocation> {
        let presence = rt.presence.snapshot();
        let known = state.seat_ids();
        let futures = state.active_seats().into_iter().map(|seat| {
            let presence = &presence;
            let known = &known;
            async move {
                let ctx = RoundContext::for_seat(state, seat, rt.config.entry_fee);
                let raw = match self
                    .resolve_decision(rt, presence, seat, DecisionKind::Propose, &ctx)
                    .await
                {
                    Some(DecisionResponse::Shares(raw)) => raw,
                    _ => {
                        debug!(game_id = %state.game_id, seat, "no proposal, seat keeps the pool");
                        return (seat, Allocation::self_take_all(seat));
                    }
                };

                let filtered: BTreeMap<SeatId, u32> = raw
                    .iter()
                    .filter(|(k, _)| known.contains(k))
                    .map(|(&k, &v)| (k, v))
                    .collect();
                if filtered.len() != raw.len() {
                    warn!(
                        game_id = %state.game_id,
                        seat,
                        dropped = raw.len() - filtered.len(),
                        "proposal named unknown seats"
                    );
                }

                let (allocation, normalized) = Allocation::normalized(&filtered, seat);
                if normalized.malformed {
                    let err = DomainError::malformed(
                        seat,
                        format!("allocation summed to {}", normalized.original_sum),
                    );
                    warn!(game_id = %state.game_id, seat, %err, "proposal renormalized");
                }
                (seat, allocation)
            }
        });
        join_all(futures).await.into_iter().collect()
    }

    /// Concurrently collect one ballot from every seat, eliminated seats
    /// included. Weights are filtered down to actual proposers; a seat that
    /// produces nothing usable votes an even split.
    pub(super) async fn collect_ballots(
        &self,
        rt: &GameRuntime,
        state: &GameState,
    ) -> BTreeMap<SeatId, Ballot> {
        let presence = rt.presence.snapshot();
        let proposers: Vec<SeatId> = state.proposals.keys().copied().collect();
        let futures = state.seat_ids().into_iter().map(|seat| {
            let presence = &presence;
            let proposers = &proposers;
            async move {
                let ctx = RoundContext::for_seat(state, seat, rt.config.entry_fee);
                let raw = match self
                    .resolve_decision(rt, presence, seat, DecisionKind::Vote, &ctx)
                    .await
                {
                    Some(DecisionResponse::Shares(raw)) => raw,
                    _ => BTreeMap::new(),
                };

                let filtered: BTreeMap<SeatId, u32> = raw
                    .iter()
                    .filter(|(k, _)| proposers.contains(k))
                    .map(|(&k, &v)| (k, v))
                    .collect();
                if filtered.len() != raw.len() {
                    warn!(
                        game_id = %state.game_id,
                        seat,
                        dropped = raw.len() - filtered.len(),
                        "ballot weighted non-proposers"
                    );
                }

                let ballot = if filtered.values().any(|&w| w > 0) {
                    match Ballot::normalized(&filtered, proposers) {
                        Some((ballot, normalized)) => {
                            if normalized.malformed {
                                let err = DomainError::malformed(
                                    seat,
                                    format!("ballot summed to {}", normalized.original_sum),
                                );
                                warn!(game_id = %state.game_id, seat, %err, "ballot renormalized");
                            }
                            Some(ballot)
                        }
                        None => None,
                    }
                } else {
                    None
                };
                ballot
                    .or_else(|| Ballot::even_split(proposers))
                    .map(|b| (seat, b))
            }
        });
        join_all(futures).await.into_iter().flatten().collect()
    }

    /// Collect elimination nominations from active seats (direct-nomination
    /// mode). Seats with no usable answer simply do not nominate.
    pub(super) async fn collect_nominations(
        &self,
        rt: &GameRuntime,
        state: &GameState,
    ) -> BTreeMap<SeatId, SeatId> {
        let presence = rt.presence.snapshot();
        let futures = state.active_seats().into_iter().map(|seat| {
            let presence = &presence;
            async move {
                let ctx = RoundContext::for_seat(state, seat, rt.config.entry_fee);
                match self
                    .resolve_decision(rt, presence, seat, DecisionKind::Eliminate, &ctx)
                    .await
                {
                    Some(DecisionResponse::Seat(target)) => Some((seat, target)),
                    _ => None,
                }
            }
        });
        join_all(futures).await.into_iter().flatten().collect()
    }
}
