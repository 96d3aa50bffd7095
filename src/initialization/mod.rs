//! Process-wide initialization.
//!
//! Hosts never install a logger themselves; test binaries opt in with
//! [`init_test_logger`] or [`init_logger_with`].

mod logger;

pub use logger::{init_logger_with, init_test_logger};
