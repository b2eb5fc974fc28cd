//! Server errors.

use std::net::{AddrParseError, SocketAddr};

use thiserror::Error;

/// Failures while building or running a server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The configured address does not parse.
    #[error("invalid address '{addr}': {source}")]
    InvalidAddress {
        /// Address as configured.
        addr: String,
        /// Parse failure.
        #[source]
        source: AddrParseError,
    },

    /// The listener could not be bound.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        /// Address that was tried.
        addr: SocketAddr,
        /// I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Two endpoints were registered under the same name.
    #[error("endpoint '{0}' is registered more than once")]
    DuplicateEndpoint(String),

    /// Other I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
