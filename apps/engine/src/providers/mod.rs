//! Decision providers - the pluggable per-seat decision capability.
//!
//! This module provides:
//! - the `DecisionProvider` trait and `RoundContext` request view
//! - `ScriptedAgent`: seeded rule-based reference implementation
//! - `EvenSplitAgent`: neutral baseline
//! - `HumanProvider`: channel-backed, resolved by inbound seat actions
//! - `ExternalAgent`: request/response adapter for external generators
//! - a static registry of autonomous agents

pub mod context;
mod even_split;
mod external;
mod human;
pub mod registry;
mod scripted;
mod seed;
mod trait_def;

use std::sync::Arc;

pub use context::RoundContext;
pub use even_split::EvenSplitAgent;
pub use external::{DecisionKind, DecisionRequest, DecisionResponse, ExternalAgent};
pub use human::{HumanDecision, HumanProvider};
pub use scripted::ScriptedAgent;
pub use seed::derive_seat_seed;
pub use trait_def::{DecisionProvider, ProviderError};

use serde_json::Value as JsonValue;

/// Create an autonomous provider from a registry name and optional config.
///
/// The config is an advisory JSON object; currently only `{"seed": n}` is
/// read. Returns None if the name is unrecognized.
pub fn create_provider(name: &str, config: Option<&JsonValue>) -> Option<Arc<dyn DecisionProvider>> {
    let factory = registry::by_name(name)?;
    let seed = config.and_then(|c| c.get("seed")).and_then(|s| s.as_u64());
    Some((factory.make)(seed))
}
