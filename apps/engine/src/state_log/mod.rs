//! Append-only state log.
//!
//! Every committed transition and every negotiation/chat message is recorded
//! with an ordered read API so audit and spectator tooling can replay a full
//! game. Storage engine internals are out of scope; the engine only speaks
//! this trait, and `MemoryStateLog` is the bundled implementation.

use parking_lot::Mutex;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::snapshot::GameSnapshot;
use crate::domain::state::{Phase, SeatId};

/// One committed transition.
#[derive(Debug, Clone, PartialEq)]
pub struct StateLogEntry {
    pub game_id: Uuid,
    pub phase: Phase,
    pub round_no: u8,
    pub snapshot: GameSnapshot,
    pub at: OffsetDateTime,
}

/// One negotiation/chat message record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub game_id: Uuid,
    pub round_no: u8,
    pub seat: SeatId,
    pub text: String,
    pub at: OffsetDateTime,
}

/// Append-only sink with ordered reads.
pub trait StateLog: Send + Sync {
    fn append_state(&self, entry: StateLogEntry);
    fn append_message(&self, record: MessageRecord);
    /// All state entries for a game, in append order.
    fn read_states(&self, game_id: Uuid) -> Vec<StateLogEntry>;
    /// All message records for a game, in append order.
    fn read_messages(&self, game_id: Uuid) -> Vec<MessageRecord>;
}

/// In-memory log; append order is insertion order.
#[derive(Default)]
pub struct MemoryStateLog {
    states: Mutex<Vec<StateLogEntry>>,
    messages: Mutex<Vec<MessageRecord>>,
}

impl MemoryStateLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateLog for MemoryStateLog {
    fn append_state(&self, entry: StateLogEntry) {
        self.states.lock().push(entry);
    }

    fn append_message(&self, record: MessageRecord) {
        self.messages.lock().push(record);
    }

    fn read_states(&self, game_id: Uuid) -> Vec<StateLogEntry> {
        self.states
            .lock()
            .iter()
            .filter(|e| e.game_id == game_id)
            .cloned()
            .collect()
    }

    fn read_messages(&self, game_id: Uuid) -> Vec<MessageRecord> {
        self.messages
            .lock()
            .iter()
            .filter(|m| m.game_id == game_id)
            .cloned()
            .collect()
    }
}
