use crate::types::{GenerationConfig, LLMChunk};
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use taskpad_core::HistoryTurn;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LLMError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Protocol conversion error: {0}")]
    Protocol(#[from] crate::protocol::ProtocolError),
}

impl LLMError {
    /// Whether the upstream refused the configured credential
    pub fn is_credential_error(&self) -> bool {
        match self {
            LLMError::Auth(_) => true,
            LLMError::Api(msg) | LLMError::Stream(msg) => mentions_api_key(msg),
            _ => false,
        }
    }
}

pub(crate) fn mentions_api_key(text: &str) -> bool {
    text.contains("API key") || text.contains("API_KEY_INVALID")
}

pub type Result<T> = std::result::Result<T, LLMError>;

pub type LLMStream = Pin<Box<dyn Stream<Item = Result<LLMChunk>> + Send>>;

#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Stream a completion for `message` with `history` as prior context
    ///
    /// # Arguments
    /// * `history` - Prior turns, oldest first
    /// * `message` - The new user message
    /// * `generation` - Output length and sampling parameters
    ///
    /// Errors returned here happen before any fragment is produced; errors
    /// yielded by the stream happen mid-response.
    async fn chat_stream(
        &self,
        history: &[HistoryTurn],
        message: &str,
        generation: &GenerationConfig,
    ) -> Result<LLMStream>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_errors_are_detected() {
        assert!(LLMError::Auth("denied".into()).is_credential_error());
        assert!(LLMError::Api("API key not valid. Please pass a valid API key.".into())
            .is_credential_error());
        assert!(LLMError::Stream("reason: API_KEY_INVALID".into()).is_credential_error());
        assert!(!LLMError::Api("quota exceeded".into()).is_credential_error());
        assert!(!LLMError::Stream("connection reset".into()).is_credential_error());
    }
}
