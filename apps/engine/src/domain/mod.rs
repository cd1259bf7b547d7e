//! Domain layer: pure game logic types and helpers.

pub mod allocation;
pub mod events;
pub mod resolver;
pub mod settlement;
pub mod snapshot;
pub mod state;

#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod test_state_helpers;

#[cfg(test)]
mod tests_allocation;
#[cfg(test)]
mod tests_props_resolver;
#[cfg(test)]
mod tests_props_settlement;
#[cfg(test)]
mod tests_settlement;
#[cfg(test)]
mod tests_transition;

// Re-exports for ergonomics
pub use allocation::{Allocation, Ballot, SHARE_SUM, SHARE_TOLERANCE};
pub use events::{transition, GameEvent};
pub use resolver::{resolve_nominations, resolve_round, RoundOutcome, Verdict, SUPERMAJORITY_PCT};
pub use settlement::{settle, Settlement};
pub use snapshot::GameSnapshot;
pub use state::{GameState, NegotiationMessage, Phase, ProviderKind, Seat, SeatId, MIN_SEATS};
