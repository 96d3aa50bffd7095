//! Failure reporting.
//!
//! Every failure the crate detects funnels through a [`FailureReporter`]:
//! assertion mismatches are recoverable ([`FailureReporter::error`]), setup
//! defects and mandatory decode failures are fatal ([`FailureReporter::fatal`]).
//!
//! Two implementations ship with the crate:
//! - [`StandardReporter`] - the default; fails the running test
//! - [`RecordingReporter`] - keeps failures for inspection, never panics

mod recording;
mod standard;

pub use recording::RecordingReporter;
pub use standard::StandardReporter;

/// Severity of a reported failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureLevel {
    /// The test is marked failed but keeps running.
    Error,
    /// The test cannot meaningfully continue.
    Fatal,
}

/// A failure as seen by a reporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// How severe the failure is
    pub level: FailureLevel,
    /// Human-readable description
    pub message: String,
}

/// Capability to mark the outcome of the running test.
///
/// Implementations must be shareable across the server's worker threads:
/// the dispatcher reports unmocked calls from whichever thread serves the request.
pub trait FailureReporter: Send + Sync {
    /// Records a recoverable failure; the caller keeps going.
    fn error(&self, message: &str);

    /// Records a failure after which the current test should stop.
    ///
    /// Implementations may unwind (the default reporter does), but callers
    /// must not rely on it: code after a `fatal` call still has to leave
    /// things in a consistent state.
    fn fatal(&self, message: &str);
}
