//! Google Gemini provider implementation.

mod stream;

pub use stream::parse_gemini_sse_event;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use taskpad_core::HistoryTurn;

use crate::protocol::gemini::GeminiErrorEnvelope;
use crate::protocol::GeminiProtocol;
use crate::provider::{mentions_api_key, LLMError, LLMProvider, LLMStream, Result};
use crate::providers::common::sse::llm_stream_from_sse;
use crate::types::GenerationConfig;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Header carrying the credential, so it never appears in request URLs.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Google Gemini API provider.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider with an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Set a custom base URL (e.g., for proxies or a local mock).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn stream_url(&self) -> String {
        format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            self.base_url, self.model
        )
    }
}

/// Map a non-success upstream response to an error.
///
/// Gemini answers a bad key with 400 `API_KEY_INVALID`, so the body is
/// checked as well as the status.
fn classify_failure(status: StatusCode, body: &str) -> LLMError {
    let message = serde_json::from_str::<GeminiErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .ok()
        .filter(|msg| !msg.is_empty())
        .unwrap_or_else(|| body.to_string());

    if status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || mentions_api_key(body)
    {
        return LLMError::Auth(format!("Gemini authentication failed: {}", message));
    }

    LLMError::Api(format!("Gemini API error: HTTP {}: {}", status, message))
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    async fn chat_stream(
        &self,
        history: &[HistoryTurn],
        message: &str,
        generation: &GenerationConfig,
    ) -> Result<LLMStream> {
        let request = GeminiProtocol::build_request(history, message, generation)?;

        log::debug!(
            "Gemini request: model={} contents={}",
            self.model,
            request.contents.len()
        );

        let response = self
            .client
            .post(self.stream_url())
            .header("Content-Type", "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LLMError::Http(e.without_url()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|e| LLMError::Http(e.without_url()))?;
            let err = classify_failure(status, &text);
            log::warn!("Gemini request rejected: {}", err);
            return Err(err);
        }

        log::debug!("Gemini stream started successfully");

        Ok(llm_stream_from_sse(response, parse_gemini_sse_event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_provider() {
        let provider = GeminiProvider::new("test_key");
        assert_eq!(provider.api_key, "test_key");
        assert_eq!(provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(provider.model(), "gemini-2.5-flash");
    }

    #[test]
    fn test_chained_builders() {
        let provider = GeminiProvider::new("test_key")
            .with_base_url("https://custom.api.com/")
            .with_model("gemini-ultra");

        assert_eq!(provider.base_url, "https://custom.api.com");
        assert_eq!(provider.model, "gemini-ultra");
    }

    #[test]
    fn test_url_construction() {
        let provider = GeminiProvider::new("my_api_key_123")
            .with_base_url("https://test.api.com/v1beta")
            .with_model("gemini-custom");

        assert_eq!(
            provider.stream_url(),
            "https://test.api.com/v1beta/models/gemini-custom:streamGenerateContent?alt=sse"
        );
        assert!(!provider.stream_url().contains("my_api_key_123"));
    }

    #[test]
    fn test_classify_failure() {
        let bad_key = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT","details":[{"reason":"API_KEY_INVALID"}]}}"#;
        let err = classify_failure(StatusCode::BAD_REQUEST, bad_key);
        assert!(matches!(err, LLMError::Auth(ref msg) if msg.contains("API key not valid")));

        let err = classify_failure(StatusCode::FORBIDDEN, "denied");
        assert!(err.is_credential_error());

        let err = classify_failure(StatusCode::TOO_MANY_REQUESTS, "quota exceeded");
        assert!(matches!(err, LLMError::Api(ref msg) if msg.contains("429")));
        assert!(!err.is_credential_error());
    }
}
