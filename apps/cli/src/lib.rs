//! Command line front end for the shopping list.

pub mod commands;
pub mod config;

/// Initialize tracing subscriber.
///
/// Logs go to stderr so that command output on stdout stays parseable.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
