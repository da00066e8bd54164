pub mod chat;
pub mod todo;

pub use chat::{ChatMessage, ChatTranscript, ConversationHistory, HistoryTurn, Part, Role};
pub use todo::{TodoItem, TodoList};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
