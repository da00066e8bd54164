//! Gemini SSE stream parser.
//!
//! With `alt=sse` Gemini sends one JSON object per event:
//! ```text
//! data: {"candidates":[{"content":{"parts":[{"text":"Hel"}],"role":"model"}}]}
//!
//! data: {"candidates":[{"content":{"parts":[{"text":"lo"}],"role":"model"},"finishReason":"STOP"}]}
//! ```

use crate::protocol::gemini::{GeminiErrorEnvelope, GeminiResponse};
use crate::protocol::FromProvider;
use crate::provider::{LLMError, Result};
use crate::types::LLMChunk;
use serde_json::Value;
use taskpad_core::HistoryTurn;

/// Parse a single Gemini SSE event into an optional [`LLMChunk`].
///
/// Returns:
/// - `Ok(Some(chunk))` for events carrying text, or the `[DONE]` marker
/// - `Ok(None)` for events with nothing to forward (empty data, metadata, empty text)
/// - `Err(_)` for malformed JSON, error payloads and blocked prompts
///
/// # Example
///
/// ```
/// use taskpad_llm::providers::gemini::parse_gemini_sse_event;
/// use taskpad_llm::LLMChunk;
///
/// let data = r#"{"candidates":[{"content":{"parts":[{"text":"Hello"}],"role":"model"}}]}"#;
/// let chunk = parse_gemini_sse_event("", data).unwrap();
/// assert_eq!(chunk, Some(LLMChunk::Token("Hello".to_string())));
/// ```
pub fn parse_gemini_sse_event(_event_type: &str, data: &str) -> Result<Option<LLMChunk>> {
    let data = data.trim();

    if data.is_empty() {
        return Ok(None);
    }

    if data == "[DONE]" {
        return Ok(Some(LLMChunk::Done));
    }

    let value: Value = serde_json::from_str(data).map_err(|e| {
        LLMError::Stream(format!("Failed to parse Gemini SSE data: {}: {}", e, data))
    })?;

    if value.get("error").is_some() {
        let message = serde_json::from_value::<GeminiErrorEnvelope>(value)
            .map(|envelope| envelope.error.message)
            .unwrap_or_default();
        let message = if message.is_empty() {
            "Unknown Gemini API error".to_string()
        } else {
            message
        };
        return Err(LLMError::Api(message));
    }

    let response: GeminiResponse = serde_json::from_value(value).map_err(|e| {
        LLMError::Stream(format!("Unexpected Gemini response shape: {}: {}", e, data))
    })?;

    let Some(candidate) = response.candidates.into_iter().next() else {
        if let Some(reason) = response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
        {
            return Err(LLMError::Api(format!("Prompt blocked by Gemini: {}", reason)));
        }
        return Ok(None);
    };

    if let Some(reason) = candidate.finish_reason.as_deref() {
        log::trace!("Gemini candidate finished: {}", reason);
    }

    let Some(content) = candidate.content else {
        return Ok(None);
    };

    let text = HistoryTurn::from_provider(content)?.text();
    if text.is_empty() {
        return Ok(None);
    }

    Ok(Some(LLMChunk::Token(text)))
}
