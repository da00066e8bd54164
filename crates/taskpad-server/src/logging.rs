use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. An explicit `RUST_LOG` style filter wins,
/// otherwise `debug` enables debug output for the whole process.
///
/// Records emitted through the `log` facade (the llm crate) are forwarded too.
pub fn init_logging(debug: bool, filter: Option<&str>) {
    let default_level = if debug { "debug" } else { "info" };
    let env_filter = filter
        .and_then(|f| EnvFilter::try_new(f).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level));

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_line_number(debug)
                .with_file(false),
        )
        .try_init();

    if let Err(err) = result {
        eprintln!("Logging already initialized: {}", err);
    }
}
