//! Call-count verification.

use std::sync::Arc;

use crate::call::CallSignature;
use crate::host::MockHost;
use crate::invocation::Invocation;

/// Asserts how often one method+path was called.
///
/// Obtained from [`MockHost::verify`]. A count mismatch is fatal, but the
/// recorded invocations are always handed back so a reporter that does not
/// abort still lets the caller inspect them.
pub struct CallVerifier<'a> {
    host: &'a MockHost,
    call: CallSignature,
}

impl<'a> CallVerifier<'a> {
    pub(crate) fn new(host: &'a MockHost, call: CallSignature) -> Self {
        Self { host, call }
    }

    /// Asserts the endpoint received exactly `expected_calls` requests and
    /// returns them in arrival order.
    pub fn has_been_called(&self, expected_calls: usize) -> Vec<Arc<Invocation>> {
        let invocations = self.host.state().ledger.invocations(&self.call);
        if invocations.len() != expected_calls {
            self.host.reporter().fatal(&format!(
                "got {} http calls to {} but was expecting {}",
                invocations.len(),
                self.call,
                expected_calls
            ));
        }
        invocations
    }

    /// Asserts the endpoint received exactly one request and returns it.
    ///
    /// `None` only when the check failed with nothing recorded.
    pub fn has_been_called_once(&self) -> Option<Arc<Invocation>> {
        self.has_been_called(1).into_iter().next()
    }

    /// Asserts the endpoint received no request.
    pub fn has_not_been_called(&self) {
        let _ = self.has_been_called(0);
    }
}
