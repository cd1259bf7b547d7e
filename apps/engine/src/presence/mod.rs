//! Per-game presence tracking.
//!
//! One table per game instance, injected into the round coordinator; there
//! is no process-global registry of seats or sockets, so concurrently
//! running games cannot interfere with each other. The transport layer feeds
//! connect/disconnect edges in; the coordinator samples the table once at
//! the start of each sub-phase's decision collection.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::domain::state::SeatId;

/// Live connected/disconnected flags for every seat in one game.
pub struct PresenceTable {
    seats: RwLock<BTreeMap<SeatId, bool>>,
}

impl PresenceTable {
    /// Seats start connected; they joined to get here.
    pub fn new(seat_ids: impl IntoIterator<Item = SeatId>) -> Self {
        Self {
            seats: RwLock::new(seat_ids.into_iter().map(|s| (s, true)).collect()),
        }
    }

    pub fn mark_connected(&self, seat: SeatId) {
        self.set(seat, true);
    }

    pub fn mark_disconnected(&self, seat: SeatId) {
        self.set(seat, false);
    }

    fn set(&self, seat: SeatId, connected: bool) {
        if let Some(flag) = self.seats.write().get_mut(&seat) {
            *flag = connected;
        }
    }

    pub fn is_connected(&self, seat: SeatId) -> bool {
        self.seats.read().get(&seat).copied().unwrap_or(false)
    }

    /// Point-in-time copy, taken once per sub-phase. A seat sampled as
    /// absent resolves through its fallback; a human seat's inbox stays in
    /// the race, so a reconnect submission inside the window still wins.
    pub fn snapshot(&self) -> PresenceSnapshot {
        PresenceSnapshot {
            seats: self.seats.read().clone(),
        }
    }
}

/// Immutable presence sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceSnapshot {
    seats: BTreeMap<SeatId, bool>,
}

impl PresenceSnapshot {
    pub fn is_connected(&self, seat: SeatId) -> bool {
        self.seats.get(&seat).copied().unwrap_or(false)
    }
}
