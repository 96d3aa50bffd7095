//! Reporter that only records.

use std::sync::{Mutex, PoisonError};

use super::{Failure, FailureLevel, FailureReporter};

/// Collects failures without ever panicking.
///
/// Useful to test assertion helpers themselves, or to inspect what a host
/// reported after the fact.
///
/// ```
/// use mock_api::{FailureReporter, RecordingReporter};
///
/// let reporter = RecordingReporter::new();
/// reporter.error("header 'x' found where it was expected not to");
/// assert!(reporter.has_errors());
/// assert!(!reporter.has_fatals());
/// ```
#[derive(Debug, Default)]
pub struct RecordingReporter {
    failures: Mutex<Vec<Failure>>,
}

impl RecordingReporter {
    /// Creates an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// All failures in the order they were reported.
    pub fn failures(&self) -> Vec<Failure> {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Messages of recoverable failures.
    pub fn errors(&self) -> Vec<String> {
        self.messages(FailureLevel::Error)
    }

    /// Messages of fatal failures.
    pub fn fatals(&self) -> Vec<String> {
        self.messages(FailureLevel::Fatal)
    }

    /// Whether any recoverable failure was reported.
    pub fn has_errors(&self) -> bool {
        !self.errors().is_empty()
    }

    /// Whether any fatal failure was reported.
    pub fn has_fatals(&self) -> bool {
        !self.fatals().is_empty()
    }

    /// Panics listing every recorded failure, if there is any.
    pub fn assert_no_failures(&self) {
        let failures = self.failures();
        if failures.is_empty() {
            return;
        }
        let listing: String = failures
            .iter()
            .map(|f| format!("  - [{:?}] {}\n", f.level, f.message))
            .collect();
        panic!("unexpected failures\n{}", listing);
    }

    fn messages(&self, level: FailureLevel) -> Vec<String> {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|f| f.level == level)
            .map(|f| f.message.clone())
            .collect()
    }

    fn record(&self, level: FailureLevel, message: &str) {
        log::debug!("recorded {:?} failure: {}", level, message);
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Failure {
                level,
                message: message.to_string(),
            });
    }
}

impl FailureReporter for RecordingReporter {
    fn error(&self, message: &str) {
        self.record(FailureLevel::Error, message);
    }

    fn fatal(&self, message: &str) {
        self.record(FailureLevel::Fatal, message);
    }
}
