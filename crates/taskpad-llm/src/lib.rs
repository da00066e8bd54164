pub mod protocol;
pub mod provider;
pub mod providers;
pub mod types;

pub use provider::{LLMError, LLMProvider, LLMStream};
pub use providers::GeminiProvider;
pub use types::{GenerationConfig, LLMChunk};
