//! Logging initialization for the CLI.
//!
//! The core crate only emits `tracing` events; the subscriber is installed
//! here, once, at startup.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Build the event filter.
///
/// `RUST_LOG` sets the baseline (default `warn`); the verbosity flag then
/// raises minivite's own targets: 0 = INFO, 1 = DEBUG, 2+ = TRACE.
pub fn filter(verbosity: u8) -> EnvFilter {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let base = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    ["minivite", "minivite_core", "tower_http"]
        .into_iter()
        .filter_map(|target| format!("{target}={level}").parse().ok())
        .fold(base, EnvFilter::add_directive)
}

/// Install the global subscriber. With `json`, events are written to
/// stderr as JSON lines:
///
/// ```json
/// {"timestamp":"...","level":"INFO","fields":{"message":"listening","url":"http://localhost:3000"},"target":"minivite::commands::dev"}
/// ```
///
/// Calling this twice is a no-op.
pub fn init(verbosity: u8, json: bool) {
    let subscriber = tracing_subscriber::registry().with(filter(verbosity));

    let result = if json {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        subscriber
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
