pub mod app;
pub mod decoder;
pub mod widget;

pub use app::{apply, CommandError, Outcome, TaskCommand};
pub use decoder::Utf8StreamDecoder;
pub use widget::{ChatWidget, Exchange};
