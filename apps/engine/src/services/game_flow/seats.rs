//! Seat creation and provider wiring.
//!
//! Every seat gets a primary provider plus a seeded scripted fallback; the
//! fallback seed is derived from the game seed so a given game replays the
//! same way under the same configuration.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc;

use super::SeatRuntime;
use crate::domain::{GameState, ProviderKind, SeatId};
use crate::errors::domain::DomainError;
use crate::providers::{
    create_provider, derive_seat_seed, DecisionRequest, ExternalAgent, HumanDecision,
    HumanProvider, ScriptedAgent,
};

/// Buffer size for the external generator's request channel.
const EXTERNAL_REQUEST_BUFFER: usize = 16;

/// How one seat's decisions are produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderSpec {
    /// Resolved through inbound seat actions.
    Human,
    /// A registered autonomous agent, by registry name.
    Scripted {
        name: String,
        seed: Option<u64>,
    },
    /// Out-of-process generator served over a request channel.
    External,
}

/// One requested seat at game creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatSpec {
    pub display_name: String,
    pub provider: ProviderSpec,
}

impl SeatSpec {
    pub fn scripted(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            provider: ProviderSpec::Scripted {
                name: ScriptedAgent::NAME.to_string(),
                seed: None,
            },
        }
    }

    pub fn human(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            provider: ProviderSpec::Human,
        }
    }
}

/// Everything `wire_seats` produces besides the seats themselves.
pub(crate) struct WiredSeats {
    pub seats: Vec<SeatRuntime>,
    /// Inbound decision channels for human seats.
    pub action_txs: BTreeMap<SeatId, mpsc::UnboundedSender<HumanDecision>>,
    /// Request channels an external generator must serve.
    pub external_rxs: BTreeMap<SeatId, mpsc::Receiver<DecisionRequest>>,
}

/// Add one seat per spec to `state` and wire its provider chain.
pub(crate) fn wire_seats(
    state: &mut GameState,
    specs: &[SeatSpec],
    game_seed: u64,
) -> Result<WiredSeats, DomainError> {
    let mut seats = Vec::with_capacity(specs.len());
    let mut action_txs = BTreeMap::new();
    let mut external_rxs = BTreeMap::new();

    for spec in specs {
        let kind = match spec.provider {
            ProviderSpec::Human => ProviderKind::Human,
            ProviderSpec::Scripted { .. } => ProviderKind::Scripted,
            ProviderSpec::External => ProviderKind::External,
        };
        let seat = state.add_seat(spec.display_name.clone(), kind);
        let fallback_seed = derive_seat_seed(game_seed, seat);

        let provider: Arc<dyn crate::providers::DecisionProvider> = match &spec.provider {
            ProviderSpec::Human => {
                let (provider, tx) = HumanProvider::new();
                action_txs.insert(seat, tx);
                Arc::new(provider)
            }
            ProviderSpec::Scripted { name, seed } => {
                let seed = seed.unwrap_or(fallback_seed);
                create_provider(name, Some(&json!({ "seed": seed }))).ok_or_else(|| {
                    DomainError::validation(format!("unknown agent {name:?} for seat {seat}"))
                })?
            }
            ProviderSpec::External => {
                let (agent, rx) = ExternalAgent::channel(EXTERNAL_REQUEST_BUFFER);
                external_rxs.insert(seat, rx);
                Arc::new(agent)
            }
        };

        seats.push(SeatRuntime {
            seat,
            kind,
            provider,
            fallback: Arc::new(ScriptedAgent::new(Some(fallback_seed))),
        });
    }

    Ok(WiredSeats {
        seats,
        action_txs,
        external_rxs,
    })
}
