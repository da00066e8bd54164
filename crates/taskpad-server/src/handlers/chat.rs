use actix_web::{http::header, web, HttpResponse};
use serde::Deserialize;
use serde_json::Value;
use taskpad_core::{ConversationHistory, HistoryTurn};
use tokio::time::timeout;

use crate::error::{AppError, Result};
use crate::relay::{prime, spawn_relay, Primed, RelayPhase};
use crate::state::AppState;

pub const STREAM_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

#[derive(Debug, Deserialize)]
struct RawChatRequest {
    #[serde(default)]
    message: Value,
    #[serde(default)]
    history: Option<Vec<HistoryTurn>>,
}

/// Validated body of `POST /api/chat`
#[derive(Debug)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<HistoryTurn>,
}

impl ChatRequest {
    /// Parse and validate a raw body. Bodies that are not JSON, lack a
    /// non-blank string `message`, or carry malformed history are rejected.
    pub fn parse(body: &[u8]) -> Result<Self> {
        let raw: RawChatRequest =
            serde_json::from_slice(body).map_err(|_| AppError::InvalidRequest)?;

        let message = match raw.message {
            Value::String(text) if !text.trim().is_empty() => text,
            _ => return Err(AppError::InvalidRequest),
        };

        Ok(Self {
            message,
            history: raw.history.unwrap_or_default(),
        })
    }
}

pub async fn handler(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse> {
    let Some(llm) = state.llm.clone() else {
        tracing::error!("GEMINI_API_KEY is not configured");
        return Err(AppError::Configuration);
    };

    let request = ChatRequest::parse(&body).map_err(|err| {
        tracing::debug!("Rejected chat request: {}", err);
        err
    })?;

    let config = &state.config;
    let history = match config.max_history_turns {
        Some(max) => ConversationHistory::from_turns(request.history)
            .truncated(max)
            .to_vec(),
        None => request.history,
    };

    tracing::debug!(
        phase = %RelayPhase::AwaitingUpstream,
        history_turns = history.len(),
        message_len = request.message.len(),
        "calling upstream"
    );

    let upstream = match timeout(
        config.idle_timeout,
        llm.chat_stream(&history, &request.message, &config.generation),
    )
    .await
    {
        Ok(Ok(stream)) => stream,
        Ok(Err(err)) => {
            tracing::error!(phase = %RelayPhase::RejectedBeforeStream, "upstream rejected request: {}", err);
            return Err(AppError::from_upstream(&err));
        }
        Err(_) => {
            tracing::error!(phase = %RelayPhase::RejectedBeforeStream, "upstream did not answer within {:?}", config.idle_timeout);
            return Err(AppError::UpstreamRejected { credential: false });
        }
    };

    let mut response = HttpResponse::Ok();
    response
        .content_type(STREAM_CONTENT_TYPE)
        .insert_header((header::CACHE_CONTROL, "no-cache"));

    match prime(upstream, config.idle_timeout).await? {
        Primed::Empty => {
            tracing::debug!(phase = %RelayPhase::Closed, "upstream produced no text");
            Ok(response.finish())
        }
        Primed::Streaming { first, rest } => {
            tracing::debug!(phase = %RelayPhase::Streaming, "first fragment received");
            let body = spawn_relay(first, rest, config.idle_timeout, config.channel_capacity);
            Ok(response.streaming(body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskpad_core::Role;

    #[test]
    fn parse_accepts_message_and_history() {
        let body = br#"{"message":"how are you","history":[{"role":"user","parts":[{"text":"hi"}]},{"role":"model","parts":[{"text":"Hello"}]}]}"#;
        let request = ChatRequest::parse(body).unwrap();
        assert_eq!(request.message, "how are you");
        assert_eq!(request.history.len(), 2);
        assert_eq!(request.history[1].role, Role::Model);
    }

    #[test]
    fn parse_defaults_missing_history() {
        let request = ChatRequest::parse(br#"{"message":"hi"}"#).unwrap();
        assert!(request.history.is_empty());

        let request = ChatRequest::parse(br#"{"message":"hi","history":null}"#).unwrap();
        assert!(request.history.is_empty());
    }

    #[test]
    fn parse_rejects_bad_messages() {
        let bodies: [&[u8]; 6] = [
            br#"{"message":""}"#,
            br#"{"message":"   "}"#,
            br#"{"message":42}"#,
            br#"{"history":[]}"#,
            br#"not json"#,
            br#"{"message":"hi","history":[{"role":"system","parts":[]}]}"#,
        ];
        for body in bodies {
            assert!(
                matches!(ChatRequest::parse(body), Err(AppError::InvalidRequest)),
                "body should be rejected: {}",
                String::from_utf8_lossy(body)
            );
        }
    }
}
