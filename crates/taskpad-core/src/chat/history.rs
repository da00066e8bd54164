use serde::{Deserialize, Serialize};

use super::types::{HistoryTurn, Role};

/// Context forwarded upstream on every call.
///
/// Grows by one user/model pair per completed exchange and is never trimmed
/// unless a caller asks for [`ConversationHistory::truncated`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ConversationHistory {
    turns: Vec<HistoryTurn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_turns(turns: Vec<HistoryTurn>) -> Self {
        Self { turns }
    }

    pub fn record_exchange(&mut self, user: impl Into<String>, model: impl Into<String>) {
        self.turns.push(HistoryTurn::user(user));
        self.turns.push(HistoryTurn::model(model));
    }

    pub fn turns(&self) -> &[HistoryTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Most recent `max_turns` turns. The result never starts with a model
    /// turn, so it can be one shorter than `max_turns`.
    pub fn truncated(&self, max_turns: usize) -> &[HistoryTurn] {
        let mut start = self.turns.len().saturating_sub(max_turns);
        while start < self.turns.len() && self.turns[start].role == Role::Model {
            start += 1;
        }
        &self.turns[start..]
    }
}
