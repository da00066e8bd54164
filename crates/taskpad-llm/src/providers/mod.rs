pub mod common;
pub mod gemini;

pub use gemini::GeminiProvider;
