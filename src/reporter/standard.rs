//! Default reporter backed by panics.

use std::sync::{Mutex, PoisonError};
use std::thread;

use super::FailureReporter;

/// Fails the running test the way `assert!` does.
///
/// `fatal` logs and panics immediately. `error` only logs and remembers the
/// message; the remembered failures are raised as a single panic when the
/// reporter is dropped, which happens once the host and every invocation
/// handed out by it are gone. Fatal messages are remembered too, since a
/// panic on a server worker thread never reaches the test thread.
#[derive(Debug, Default)]
pub struct StandardReporter {
    pending: Mutex<Vec<String>>,
}

impl StandardReporter {
    /// Creates a reporter with no pending failures.
    pub fn new() -> Self {
        Self::default()
    }

    fn remember(&self, message: &str) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

impl FailureReporter for StandardReporter {
    fn error(&self, message: &str) {
        log::error!("{}", message);
        self.remember(message);
    }

    fn fatal(&self, message: &str) {
        log::error!("fatal: {}", message);
        self.remember(message);
        panic!("{}", message);
    }
}

impl Drop for StandardReporter {
    fn drop(&mut self) {
        let pending = std::mem::take(
            self.pending
                .get_mut()
                .unwrap_or_else(PoisonError::into_inner),
        );
        // A second panic while unwinding would abort the whole test binary
        if pending.is_empty() || thread::panicking() {
            return;
        }
        let summary: String = pending
            .iter()
            .map(|message| format!("  - {}\n", message))
            .collect();
        panic!("{} mock API failure(s):\n{}", pending.len(), summary);
    }
}
