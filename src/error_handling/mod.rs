//! Error types.
//!
//! Errors here cover the harness itself (binding, runtime, logger). Failures
//! of the code under test never surface as `Result`s; they go through the
//! host's [`crate::FailureReporter`].

mod types;

pub use types::{InitializationError, MockHostError};
