use clap::Parser;
use std::io;

use taskpad_server::config::{load_env_files, ServerArgs};
use taskpad_server::logging::init_logging;
use taskpad_server::run_server;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Before parsing so the env fallbacks see the files.
    let env_files = load_env_files();
    let args = ServerArgs::parse();

    init_logging(args.debug, args.log_level.as_deref());
    for path in &env_files {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let config = args.relay_config();
    tracing::info!("Starting Taskpad server on {}:{}", args.host, args.port);
    tracing::info!("Relay configuration:");
    tracing::info!("  Model: {}", config.model);
    tracing::info!("  Base URL: {}", config.base_url);
    tracing::info!("  Idle timeout: {:?}", config.idle_timeout);
    match config.max_history_turns {
        Some(max) => tracing::info!("  History cap: {} turns", max),
        None => tracing::info!("  History cap: none"),
    }

    if args.debug {
        tracing::debug!("Debug mode enabled");
        tracing::debug!("  Channel capacity: {}", config.channel_capacity);
        tracing::debug!("  Generation: {:?}", config.generation);
    }

    run_server(config, &args.host, args.port).await
}
