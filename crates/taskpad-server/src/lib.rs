pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod relay;
pub mod server;
pub mod state;

pub use config::{RelayConfig, ServerArgs};
pub use error::{AppError, RelayError};
pub use server::{app_config, build_server, run_server};
pub use state::AppState;
