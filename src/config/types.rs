//! Configuration types.

use std::net::SocketAddr;

use super::constants::{DEFAULT_BIND_ADDR, DEFAULT_WORKER_THREADS};

/// Logging level for [`crate::initialization::init_logger_with`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    #[default]
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Settings for a single mock host.
///
/// Everything has a sensible default; tests normally never build one by hand.
///
/// # Examples
///
/// ```
/// use mock_api::MockHostConfig;
///
/// let config = MockHostConfig {
///     worker_threads: 4,
///     ..Default::default()
/// };
/// assert_eq!(config.bind_addr.port(), 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockHostConfig {
    /// Address to bind. Port 0 lets the OS pick a free port.
    pub bind_addr: SocketAddr,

    /// Worker threads of the runtime serving requests (at least 1)
    pub worker_threads: usize,
}

impl Default for MockHostConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR,
            worker_threads: DEFAULT_WORKER_THREADS,
        }
    }
}
