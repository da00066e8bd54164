use std::sync::Arc;
use taskpad_llm::{GeminiProvider, LLMProvider};

use crate::config::RelayConfig;

pub struct AppState {
    /// `None` while no credential is configured
    pub llm: Option<Arc<dyn LLMProvider>>,
    pub config: RelayConfig,
}

impl AppState {
    pub fn from_config(config: RelayConfig) -> Self {
        let llm = config.api_key.as_ref().map(|key| {
            tracing::info!(
                "Using Gemini model '{}' at {}",
                config.model,
                config.base_url
            );
            Arc::new(
                GeminiProvider::new(key.clone())
                    .with_base_url(config.base_url.clone())
                    .with_model(config.model.clone()),
            ) as Arc<dyn LLMProvider>
        });

        Self { llm, config }
    }

    /// State backed by an arbitrary provider, regardless of `config.api_key`.
    pub fn with_provider(provider: Arc<dyn LLMProvider>, config: RelayConfig) -> Self {
        Self {
            llm: Some(provider),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_is_built_only_with_a_key() {
        assert!(AppState::from_config(RelayConfig::default()).llm.is_none());

        let config = RelayConfig {
            api_key: Some("key".to_string()),
            ..RelayConfig::default()
        };
        assert!(AppState::from_config(config).llm.is_some());
    }
}
