//! Google Gemini protocol conversion implementation.
//!
//! Gemini API has a unique format:
//! - Messages are called "contents"
//! - Role is "user" or "model"
//! - Content is an array of "parts"
//! - Sampling parameters live in "generationConfig"
//!
//! # Example Gemini Request
//! ```json
//! {
//!   "contents": [
//!     { "role": "user", "parts": [{"text": "Hello"}] }
//!   ],
//!   "generationConfig": { "maxOutputTokens": 1000, "temperature": 0.9 }
//! }
//! ```

use crate::protocol::{FromProvider, ProtocolError, ProtocolResult, ToProvider};
use crate::types::GenerationConfig;
use serde::{Deserialize, Serialize};
use taskpad_core::{HistoryTurn, Part, Role};

/// Gemini protocol converter.
pub struct GeminiProtocol;

// ============================================================================
// Gemini API Types
// ============================================================================

/// Gemini request format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    /// Conversation history followed by the new user message
    pub contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GeminiGenerationConfig>,
}

/// Gemini message/content format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiContent {
    /// "user" or "model"
    #[serde(default = "default_content_role")]
    pub role: String,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

fn default_content_role() -> String {
    "model".to_string()
}

/// Gemini content part. Only text parts are produced or consumed here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    pub max_output_tokens: u32,
    pub temperature: f32,
}

/// One streamed response chunk (`streamGenerateContent?alt=sse`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPromptFeedback {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

/// Error envelope returned in error bodies and, occasionally, inside a stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiErrorEnvelope {
    pub error: GeminiErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiErrorBody {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

// ============================================================================
// Gemini → Internal (FromProvider)
// ============================================================================

impl FromProvider<GeminiContent> for HistoryTurn {
    fn from_provider(content: GeminiContent) -> ProtocolResult<Self> {
        let role = match content.role.as_str() {
            "user" => Role::User,
            "model" => Role::Model,
            _ => return Err(ProtocolError::InvalidRole(content.role)),
        };

        // Non-text parts carry nothing the relay can forward.
        let parts = content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .map(|text| Part { text })
            .collect();

        Ok(HistoryTurn { role, parts })
    }
}

// ============================================================================
// Internal → Gemini (ToProvider)
// ============================================================================

impl ToProvider<GeminiContent> for HistoryTurn {
    fn to_provider(&self) -> ProtocolResult<GeminiContent> {
        let role = match self.role {
            Role::User => "user",
            Role::Model => "model",
        };

        let mut parts: Vec<GeminiPart> = self
            .parts
            .iter()
            .map(|part| GeminiPart {
                text: Some(part.text.clone()),
            })
            .collect();

        // Gemini rejects contents without parts
        if parts.is_empty() {
            parts.push(GeminiPart {
                text: Some(String::new()),
            });
        }

        Ok(GeminiContent {
            role: role.to_string(),
            parts,
        })
    }
}

impl ToProvider<GeminiGenerationConfig> for GenerationConfig {
    fn to_provider(&self) -> ProtocolResult<GeminiGenerationConfig> {
        Ok(GeminiGenerationConfig {
            max_output_tokens: self.max_output_tokens,
            temperature: self.temperature,
        })
    }
}

impl GeminiProtocol {
    /// Build a streaming request: prior turns, then the new user message.
    pub fn build_request(
        history: &[HistoryTurn],
        message: &str,
        generation: &GenerationConfig,
    ) -> ProtocolResult<GeminiRequest> {
        let mut contents = history
            .iter()
            .map(|turn| turn.to_provider())
            .collect::<ProtocolResult<Vec<GeminiContent>>>()?;
        contents.push(HistoryTurn::user(message).to_provider()?);

        Ok(GeminiRequest {
            contents,
            generation_config: Some(generation.to_provider()?),
        })
    }
}
