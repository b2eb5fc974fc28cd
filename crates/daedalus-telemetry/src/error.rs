//! Telemetry error types.

use thiserror::Error;

/// Errors raised while installing the logging subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A global subscriber is already installed.
    #[error("logging is already initialized")]
    AlreadyInitialized,

    /// The level or filter directive does not parse.
    #[error("invalid log filter '{filter}': {reason}")]
    InvalidFilter {
        /// Directive as given.
        filter: String,
        /// Parser message.
        reason: String,
    },

    /// The log format name is unknown.
    #[error("unknown log format '{0}', expected json, pretty or compact")]
    UnknownFormat(String),
}
