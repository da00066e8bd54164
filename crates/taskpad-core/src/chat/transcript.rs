use serde::{Deserialize, Serialize};

use super::types::{ChatMessage, Role};

/// Append-only list of chat entries for one session.
///
/// Only the reply slot returned by [`ChatTranscript::begin_reply`] is ever
/// rewritten, first while it streams and then once it settles.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
}

impl ChatTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> usize {
        self.messages.push(ChatMessage::user(text));
        self.messages.len() - 1
    }

    /// Add an empty streaming model entry and return its index.
    pub fn begin_reply(&mut self) -> usize {
        self.messages.push(ChatMessage::pending_reply());
        self.messages.len() - 1
    }

    pub fn update_reply(&mut self, index: usize, text: impl Into<String>) {
        if let Some(msg) = self.reply_slot(index) {
            msg.text = text.into();
            msg.streaming = true;
        }
    }

    pub fn finish_reply(&mut self, index: usize, text: impl Into<String>) {
        if let Some(msg) = self.reply_slot(index) {
            msg.text = text.into();
            msg.streaming = false;
        }
    }

    /// Replace the reply entry, including any partial text, with an error entry.
    pub fn fail_reply(&mut self, index: usize, message: impl Into<String>) {
        if let Some(msg) = self.reply_slot(index) {
            *msg = ChatMessage::failed_reply(message);
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn reply_slot(&mut self, index: usize) -> Option<&mut ChatMessage> {
        self.messages
            .get_mut(index)
            .filter(|msg| msg.role == Role::Model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_streams_then_finalizes() {
        let mut transcript = ChatTranscript::new();
        transcript.push_user("hi");
        let idx = transcript.begin_reply();
        assert!(transcript.messages()[idx].streaming);

        transcript.update_reply(idx, "He");
        transcript.update_reply(idx, "Hello");
        assert_eq!(transcript.messages()[idx].text, "Hello");
        assert!(transcript.messages()[idx].streaming);

        transcript.finish_reply(idx, "Hello");
        assert!(!transcript.messages()[idx].streaming);
        assert_eq!(transcript.len(), 2);
    }

    #[test]
    fn fail_reply_replaces_partial_text() {
        let mut transcript = ChatTranscript::new();
        transcript.push_user("hi");
        let idx = transcript.begin_reply();
        transcript.update_reply(idx, "partial");

        transcript.fail_reply(idx, "The response was interrupted.");

        let msg = &transcript.messages()[idx];
        assert!(msg.error);
        assert!(!msg.streaming);
        assert_eq!(msg.text, "The response was interrupted.");
    }

    #[test]
    fn user_entries_are_never_rewritten() {
        let mut transcript = ChatTranscript::new();
        let user_idx = transcript.push_user("hi");

        transcript.update_reply(user_idx, "overwritten");
        transcript.fail_reply(user_idx, "boom");
        transcript.update_reply(99, "out of range");

        assert_eq!(transcript.messages()[user_idx], ChatMessage::user("hi"));
    }
}
