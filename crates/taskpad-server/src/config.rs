//! Configuration for the chat relay.
//!
//! Values come from CLI flags with environment fallbacks. `.env.local` and
//! `.env` are loaded first, so either file can supply `GEMINI_API_KEY`.

use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use taskpad_llm::providers::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use taskpad_llm::GenerationConfig;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CHANNEL_CAPACITY: usize = 32;

/// Load `.env.local`, then `.env`. Variables already set in the process win,
/// and `.env.local` wins over `.env`.
pub fn load_env_files() -> Vec<PathBuf> {
    [dotenvy::from_filename(".env.local"), dotenvy::dotenv()]
        .into_iter()
        .filter_map(|loaded| loaded.ok())
        .collect()
}

#[derive(Parser, Debug, Clone)]
#[command(name = "taskpad-server")]
#[command(about = "Taskpad chat relay server")]
#[command(version)]
pub struct ServerArgs {
    /// Enable debug mode
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,

    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Server port
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Gemini API key; chat requests fail with 500 while it is unset
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Gemini model name
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Gemini API base URL
    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, env = "RELAY_MAX_OUTPUT_TOKENS", default_value_t = 1000)]
    pub max_output_tokens: u32,

    #[arg(long, env = "RELAY_TEMPERATURE", default_value_t = 0.9)]
    pub temperature: f32,

    /// Abort a reply when upstream sends nothing for this many seconds
    #[arg(
        long,
        env = "RELAY_IDLE_TIMEOUT_SECS",
        default_value_t = DEFAULT_IDLE_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub idle_timeout_secs: u64,

    /// Fragments buffered between the upstream reader and the response body
    #[arg(long, env = "RELAY_CHANNEL_CAPACITY", default_value_t = DEFAULT_CHANNEL_CAPACITY)]
    pub channel_capacity: usize,

    /// Forward only the most recent N history turns (unbounded when unset)
    #[arg(long, env = "RELAY_MAX_HISTORY_TURNS")]
    pub max_history_turns: Option<usize>,

    /// Log level (overrides debug flag)
    #[arg(long, env = "RUST_LOG")]
    pub log_level: Option<String>,
}

impl ServerArgs {
    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            api_key: normalize_api_key(self.api_key.clone()),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            generation: GenerationConfig {
                max_output_tokens: self.max_output_tokens,
                temperature: self.temperature,
            },
            idle_timeout: Duration::from_secs(self.idle_timeout_secs),
            channel_capacity: self.channel_capacity.max(1),
            max_history_turns: self.max_history_turns,
        }
    }
}

/// Settings consumed by the `/api/chat` relay.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub generation: GenerationConfig,
    pub idle_timeout: Duration,
    pub channel_capacity: usize,
    pub max_history_turns: Option<usize>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            generation: GenerationConfig::default(),
            idle_timeout: Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            max_history_turns: None,
        }
    }
}

impl RelayConfig {
    /// Load from environment variables, falling back to defaults
    ///
    /// Environment variables:
    /// - `GEMINI_API_KEY`: upstream credential (empty counts as unset)
    /// - `GEMINI_MODEL`: model name (default: gemini-2.5-flash)
    /// - `GEMINI_BASE_URL`: API base URL
    /// - `RELAY_MAX_OUTPUT_TOKENS`: output cap per reply (default: 1000)
    /// - `RELAY_TEMPERATURE`: sampling temperature (default: 0.9)
    /// - `RELAY_IDLE_TIMEOUT_SECS`: idle-fragment timeout (default: 30)
    /// - `RELAY_CHANNEL_CAPACITY`: relay buffer size (default: 32)
    /// - `RELAY_MAX_HISTORY_TURNS`: history cap (default: unbounded)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            api_key: normalize_api_key(lookup("GEMINI_API_KEY")),
            model: lookup("GEMINI_MODEL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.model),
            base_url: lookup("GEMINI_BASE_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.base_url),
            generation: GenerationConfig {
                max_output_tokens: parse_var(&lookup, "RELAY_MAX_OUTPUT_TOKENS")
                    .unwrap_or(defaults.generation.max_output_tokens),
                temperature: parse_var(&lookup, "RELAY_TEMPERATURE")
                    .unwrap_or(defaults.generation.temperature),
            },
            // Zero would fail every request before upstream can answer.
            idle_timeout: parse_var(&lookup, "RELAY_IDLE_TIMEOUT_SECS")
                .filter(|secs: &u64| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.idle_timeout),
            channel_capacity: parse_var(&lookup, "RELAY_CHANNEL_CAPACITY")
                .map(|n: usize| n.max(1))
                .unwrap_or(defaults.channel_capacity),
            max_history_turns: parse_var(&lookup, "RELAY_MAX_HISTORY_TURNS"),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

fn normalize_api_key(key: Option<String>) -> Option<String> {
    key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty())
}
