// src/utils/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

/// Sets up the logging framework using tracing_subscriber.
/// Reads log level filters from the `RUST_LOG` environment variable,
/// falling back to "info" for this crate when it is unset.
pub fn setup_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("holiday_extractor=info"));

    fmt().with_env_filter(filter).with_target(false).init();

    tracing::debug!("Logging setup complete.");
}
