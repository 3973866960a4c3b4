//! Logging setup for the `vr-engine` binary.
//!
//! Library code only emits `tracing` events; the binary installs a
//! `tracing-subscriber` formatter filtered by `VR_LOG_LEVEL` (or `RUST_LOG`).

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

/// Environment variable holding the log filter.
pub const LOG_LEVEL_ENV: &str = "VR_LOG_LEVEL";

/// Filter used when neither variable is set.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The filter directive could not be parsed.
    #[error("invalid log level/filter '{value}': unable to build EnvFilter")]
    EnvFilter {
        /// The rejected directive.
        value: String,
        /// The parse failure.
        #[source]
        source: ParseError,
    },

    /// A global subscriber was already installed.
    #[error("telemetry error: {0}")]
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

/// Resolves the filter directive: `VR_LOG_LEVEL`, then `RUST_LOG`, then `info`.
pub fn filter_directive<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    [LOG_LEVEL_ENV, EnvFilter::DEFAULT_ENV]
        .into_iter()
        .filter_map(|key| lookup(key))
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

/// Installs the global `fmt` subscriber.
pub fn init() -> Result<(), TelemetryError> {
    let directive = filter_directive(|key| std::env::var(key).ok());
    let env_filter = EnvFilter::try_new(&directive).map_err(|source| TelemetryError::EnvFilter {
        value: directive.clone(),
        source,
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(TelemetryError::Subscriber)
}
