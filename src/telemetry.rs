use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging.
///
/// - `tracing-subscriber::fmt` writing compact lines to stderr, so the
///   console transcript on stdout stays readable.
/// - `EnvFilter` for dynamic log levels (`RUST_LOG`), defaulting to
///   `warn,chat_widget=info`.
pub fn init() {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .compact();

    let filter_layer = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,chat_widget=info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
