//! Append-only conversation history.

use crate::types::{Role, SlotRequest, Turn};

/// Ordered turns of one session. Turns are never edited or reordered once
/// appended; the whole log is only dropped by a session reset.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    turns: Vec<Turn>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn and return a reference to it.
    pub fn push(&mut self, turn: Turn) -> &Turn {
        self.turns.push(turn);
        &self.turns[self.turns.len() - 1]
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Text of the most recent user turn.
    pub fn last_query(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|t| t.role == Role::User)
            .and_then(|t| t.query_text())
    }

    /// The form the front end should show: the slot request of the last turn
    /// if it is an assistant turn, otherwise none.
    pub fn pending_slot_request(&self) -> SlotRequest {
        match self.turns.last() {
            Some(turn) if turn.role == Role::Assistant => turn.slot_request,
            _ => SlotRequest::None,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.turns.clear();
    }
}
