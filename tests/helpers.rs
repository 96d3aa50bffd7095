// Shared helpers for integration tests: hosts with a recording reporter and an HTTP client.

use std::sync::Arc;
use std::time::Duration;

use mock_api::{initialization::init_test_logger, MockHost, RecordingReporter};

/// Starts a host whose failures are recorded instead of panicking.
#[allow(dead_code)] // Used by other test files
pub fn recording_host() -> (MockHost, Arc<RecordingReporter>) {
    init_test_logger();
    let reporter = Arc::new(RecordingReporter::new());
    (MockHost::with_reporter(reporter.clone()), reporter)
}

/// HTTP client with a timeout so a broken host fails the test instead of hanging it.
#[allow(dead_code)] // Used by other test files
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to build HTTP client")
}
