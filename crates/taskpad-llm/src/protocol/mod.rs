//! Protocol conversion traits and types.
//!
//! Provider wire types convert to/from the shared history types in
//! `taskpad_core`:
//!
//! ```text
//! Provider Types (Gemini)
//!     ↕
//! Internal Types (taskpad_core::HistoryTurn)
//! ```

mod errors;
pub mod gemini;

pub use errors::{ProtocolError, ProtocolResult};
pub use gemini::GeminiProtocol;

/// Trait for converting provider-specific types to internal types.
pub trait FromProvider<T>: Sized {
    fn from_provider(value: T) -> ProtocolResult<Self>;
}

/// Trait for converting internal types to provider-specific types.
pub trait ToProvider<T>: Sized {
    fn to_provider(&self) -> ProtocolResult<T>;
}
