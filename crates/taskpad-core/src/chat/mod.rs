//! Chat transcript and conversation history types shared by the relay and its clients.

pub mod history;
pub mod transcript;
pub mod types;

pub use history::ConversationHistory;
pub use transcript::ChatTranscript;
pub use types::{ChatMessage, HistoryTurn, Part, Role};
