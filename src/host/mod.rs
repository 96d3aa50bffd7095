//! The mock host: server lifecycle plus the stub and verify entry points.

mod dispatch;
mod server;

use std::sync::{Arc, Mutex, PoisonError};

use url::Url;

use crate::call::CallSignature;
use crate::config::MockHostConfig;
use crate::error_handling::MockHostError;
use crate::ledger::InvocationLedger;
use crate::reporter::{FailureReporter, StandardReporter};
use crate::stub::{StubBuilder, StubRegistry};
use crate::verify::CallVerifier;

use server::ServerHandle;

/// State shared between the host and its server tasks.
pub(crate) struct HostState {
    pub(crate) registry: StubRegistry,
    pub(crate) ledger: InvocationLedger,
    pub(crate) reporter: Arc<dyn FailureReporter>,
}

/// A local HTTP server standing in for a real API during a test.
///
/// The server starts listening as soon as the host is created and stops when
/// [`close`](Self::close) is called or the host is dropped.
///
/// # Examples
///
/// ```no_run
/// use mock_api::MockHost;
///
/// # #[tokio::main]
/// # async fn main() {
/// let api = MockHost::new();
/// api.stub("GET", "/endpoint").with_body(201, "Hello", "text/plain");
///
/// let response = reqwest::get(api.url_for("/endpoint")).await.unwrap();
/// assert_eq!(response.status(), 201);
///
/// api.verify("GET", "/endpoint")
///     .has_been_called_once()
///     .unwrap()
///     .without_header("Authorization");
/// # }
/// ```
pub struct MockHost {
    state: Arc<HostState>,
    server: Mutex<ServerHandle>,
    url: Url,
}

impl MockHost {
    /// Starts a host on a free local port, failing the test through a
    /// [`StandardReporter`].
    pub fn new() -> Self {
        Self::with_reporter(Arc::new(StandardReporter::new()))
    }

    /// Starts a host on a free local port that reports failures to `reporter`.
    ///
    /// # Panics
    ///
    /// If the server cannot start. The failure is reported as fatal first;
    /// there is no host to hand back even when the reporter does not abort.
    pub fn with_reporter(reporter: Arc<dyn FailureReporter>) -> Self {
        Self::with_config(MockHostConfig::default(), reporter)
    }

    /// Like [`with_reporter`](Self::with_reporter), with explicit settings.
    ///
    /// # Panics
    ///
    /// If the server cannot start, after reporting it as fatal.
    pub fn with_config(config: MockHostConfig, reporter: Arc<dyn FailureReporter>) -> Self {
        match Self::try_start(config, Arc::clone(&reporter)) {
            Ok(host) => host,
            Err(e) => {
                reporter.fatal(&e.to_string());
                panic!("{}", e);
            }
        }
    }

    /// Starts a host, returning an error instead of reporting it.
    ///
    /// # Errors
    ///
    /// Returns [`MockHostError`] if the address cannot be bound or the server
    /// runtime cannot be created.
    pub fn try_start(
        config: MockHostConfig,
        reporter: Arc<dyn FailureReporter>,
    ) -> Result<Self, MockHostError> {
        let state = Arc::new(HostState {
            registry: StubRegistry::new(),
            ledger: InvocationLedger::new(),
            reporter,
        });
        let mut server = ServerHandle::spawn(&config, dispatch::router(Arc::clone(&state)))?;

        let base = format!("http://{}/", server.addr());
        let url = match Url::parse(&base) {
            Ok(url) => url,
            Err(source) => {
                server.stop();
                return Err(MockHostError::Address { url: base, source });
            }
        };

        log::info!("mock server listening on {}", url);
        Ok(Self {
            state,
            server: Mutex::new(server),
            url,
        })
    }

    /// Stops the server. Later requests fail to connect.
    ///
    /// Safe to call more than once; dropping the host calls it too.
    pub fn close(&self) {
        let stopped = self
            .server
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .stop();
        if stopped {
            log::info!("mock server on {} closed", self.host());
        }
    }

    /// Base URL of the server, e.g. `http://127.0.0.1:40123/`.
    pub fn url(&self) -> Url {
        self.url.clone()
    }

    /// `host:port` of the server, e.g. `127.0.0.1:40123`.
    pub fn host(&self) -> String {
        match (self.url.host_str(), self.url.port_or_known_default()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            _ => {
                self.reporter()
                    .fatal(&format!("mock server URL {} has no host and port", self.url));
                String::new()
            }
        }
    }

    /// Port the server listens on.
    pub fn port(&self) -> u16 {
        self.url.port_or_known_default().unwrap_or_default()
    }

    /// Absolute URL for `path_and_query` on this server.
    pub fn url_for(&self, path_and_query: &str) -> String {
        let path_and_query = path_and_query
            .strip_prefix('/')
            .unwrap_or(path_and_query);
        format!("{}{}", self.url, path_and_query)
    }

    /// Starts declaring the response for `method` `path`.
    pub fn stub(&self, method: &str, path: &str) -> StubBuilder<'_> {
        StubBuilder::new(self, CallSignature::new(method, path))
    }

    /// Starts verifying the calls received on `method` `path`.
    pub fn verify(&self, method: &str, path: &str) -> CallVerifier<'_> {
        CallVerifier::new(self, CallSignature::new(method, path))
    }

    /// Every endpoint that received at least one request, stubbed or not.
    pub fn received_calls(&self) -> Vec<CallSignature> {
        self.state.ledger.calls()
    }

    pub(crate) fn state(&self) -> &HostState {
        &self.state
    }

    pub(crate) fn reporter(&self) -> &dyn FailureReporter {
        self.state.reporter.as_ref()
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MockHost {
    fn drop(&mut self) {
        self.close();
    }
}
