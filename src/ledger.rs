//! Per-endpoint history of received requests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::call::CallSignature;
use crate::invocation::Invocation;

/// Append-only record of every invocation, bucketed by call signature.
///
/// A single lock guards the whole map: appends come from concurrent server
/// tasks, reads from test code. Within a bucket, order is the order in which
/// appends acquired the lock.
#[derive(Debug, Default)]
pub struct InvocationLedger {
    entries: Mutex<HashMap<CallSignature, Vec<Arc<Invocation>>>>,
}

impl InvocationLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `invocation` to the bucket of `call`.
    pub fn record(&self, call: CallSignature, invocation: Arc<Invocation>) {
        self.lock().entry(call).or_default().push(invocation);
    }

    /// Snapshot of the invocations recorded for `call`, oldest first.
    pub fn invocations(&self, call: &CallSignature) -> Vec<Arc<Invocation>> {
        self.lock().get(call).cloned().unwrap_or_default()
    }

    /// Number of invocations recorded for `call`.
    pub fn count(&self, call: &CallSignature) -> usize {
        self.lock().get(call).map_or(0, Vec::len)
    }

    /// Signatures that received at least one request, sorted.
    pub fn calls(&self) -> Vec<CallSignature> {
        let mut calls: Vec<_> = self.lock().keys().cloned().collect();
        calls.sort();
        calls
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CallSignature, Vec<Arc<Invocation>>>> {
        // Poisoning only means some test thread panicked mid-append; the map is still valid
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
