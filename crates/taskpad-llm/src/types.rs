use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub enum LLMChunk {
    Token(String),
    Done,
}

/// Fixed sampling parameters sent with every completion request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_output_tokens: 1000,
            temperature: 0.9,
        }
    }
}
