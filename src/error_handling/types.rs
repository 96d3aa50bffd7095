//! Error type definitions.

use std::net::SocketAddr;

use log::SetLoggerError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Error types for starting a mock host.
///
/// Every variant means the harness itself is broken, not the code under test,
/// so the infallible constructors report them as fatal failures.
#[derive(Error, Debug)]
pub enum MockHostError {
    /// The listening socket could not be bound or configured.
    #[error("Failed to bind mock server to {addr}: {source}")]
    Bind {
        /// Requested bind address
        addr: SocketAddr,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The runtime or the thread driving it could not be created.
    #[error("Failed to start mock server runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// The bound address did not form a valid base URL.
    #[error("Invalid mock server URL {url}: {source}")]
    Address {
        /// The URL text that failed to parse
        url: String,
        /// Parse failure
        #[source]
        source: url::ParseError,
    },
}
