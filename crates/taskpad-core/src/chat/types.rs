use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One text part of a history turn
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Part {
    pub text: String,
}

/// History entry sent upstream: `{ "role": "user", "parts": [{ "text": "..." }] }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryTurn {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl HistoryTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part { text: text.into() }],
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part { text: text.into() }],
        }
    }

    /// Concatenated text of all parts
    pub fn text(&self) -> String {
        self.parts.iter().map(|part| part.text.as_str()).collect()
    }
}

/// Transcript entry shown in the chat widget
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    #[serde(default)]
    pub streaming: bool,
    #[serde(default)]
    pub error: bool,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            streaming: false,
            error: false,
        }
    }

    pub fn pending_reply() -> Self {
        Self {
            role: Role::Model,
            text: String::new(),
            streaming: true,
            error: false,
        }
    }

    pub fn failed_reply(message: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: message.into(),
            streaming: false,
            error: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_turn_wire_shape() {
        let turn = HistoryTurn::user("hi");
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "parts": [{"text": "hi"}]}));

        let parsed: HistoryTurn =
            serde_json::from_str(r#"{"role":"model","parts":[{"text":"He"},{"text":"llo"}]}"#)
                .unwrap();
        assert_eq!(parsed.role, Role::Model);
        assert_eq!(parsed.text(), "Hello");
    }

    #[test]
    fn unknown_role_is_rejected() {
        let parsed =
            serde_json::from_str::<HistoryTurn>(r#"{"role":"assistant","parts":[{"text":"x"}]}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn chat_message_flags_default_to_false() {
        let msg: ChatMessage = serde_json::from_str(r#"{"role":"user","text":"hi"}"#).unwrap();
        assert!(!msg.streaming);
        assert!(!msg.error);
    }
}
