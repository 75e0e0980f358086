//! Conversation transcript: an append-only, ordered log of turns.

use serde::{Deserialize, Serialize};

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Actor {
    /// The person using the widget.
    User,
    /// The remote assistant.
    Assistant,
}

/// One message in the conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who authored this turn.
    pub actor: Actor,
    /// The message text.
    pub text: String,
}

impl Turn {
    /// A user-authored turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            actor: Actor::User,
            text: text.into(),
        }
    }

    /// An assistant-authored turn.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            actor: Actor::Assistant,
            text: text.into(),
        }
    }
}

/// Ordered, append-only log of turns for one session.
///
/// The session controller is the only writer; adapters and display layers
/// only read snapshots. Append order is the sole consistency guarantee:
/// there are no turn IDs and no timestamps.
#[derive(Debug, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn at the end of the log.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Read-only view of all turns in insertion order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Owned copy of the current turns, for use across await points.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.clone()
    }

    /// Number of turns appended so far.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether no turns have been appended yet.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
