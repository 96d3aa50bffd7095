//! Fluent construction of stubbed responses.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::Request;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use futures::FutureExt;
use serde::Serialize;

use super::StubHandler;
use crate::call::CallSignature;
use crate::config::CONTENT_TYPE_JSON;
use crate::host::MockHost;

/// Declares how the mock answers one method+path.
///
/// Obtained from [`MockHost::stub`]. Nothing is registered until a terminal
/// method (`with`, `with_status_code`, `with_body`, `with_json`) runs; each
/// returns the host so further stubs can be chained.
///
/// ```no_run
/// use std::time::Duration;
/// use mock_api::MockHost;
///
/// let api = MockHost::new();
/// api.stub("GET", "/health")
///     .with_status_code(200)
///     .stub("GET", "/slow")
///     .with_delay(Duration::from_millis(200))
///     .with_body(200, "done", "text/plain");
/// ```
#[must_use = "a stub is only registered by a terminal method such as `with_status_code`"]
pub struct StubBuilder<'a> {
    host: &'a MockHost,
    call: CallSignature,
    delay: Option<Duration>,
}

impl<'a> StubBuilder<'a> {
    pub(crate) fn new(host: &'a MockHost, call: CallSignature) -> Self {
        Self {
            host,
            call,
            delay: None,
        }
    }

    /// Waits `delay` before running the handler. Only the delayed request waits.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Registers `handler` as the response producer for this endpoint.
    ///
    /// The handler gets the request with its body intact and builds the whole
    /// response. A previous stub for the same endpoint is replaced.
    pub fn with<F, Fut, R>(self, handler: F) -> &'a MockHost
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        let handler = Arc::new(handler);
        let delay = self.delay;
        let stub: StubHandler = Arc::new(move |request: Request| {
            let handler = Arc::clone(&handler);
            async move {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                handler(request).await.into_response()
            }
            .boxed()
        });
        self.host.state().registry.register(self.call, stub);
        self.host
    }

    /// Responds with `status_code` and no body.
    pub fn with_status_code(self, status_code: u16) -> &'a MockHost {
        let Some(status) = self.status(status_code) else {
            return self.host;
        };
        self.with(move |_request| async move { status })
    }

    /// Responds with `status_code`, a `Content-Type` header and `body`.
    pub fn with_body(
        self,
        status_code: u16,
        body: impl Into<Bytes>,
        content_type: &str,
    ) -> &'a MockHost {
        let Some(status) = self.status(status_code) else {
            return self.host;
        };
        let content_type = match HeaderValue::from_str(content_type) {
            Ok(value) => value,
            Err(e) => {
                self.host.reporter().fatal(&format!(
                    "invalid content type {:?} for stub {}: {}",
                    content_type, self.call, e
                ));
                return self.host;
            }
        };
        let body = body.into();
        self.with(move |_request| {
            let response = (
                status,
                [(header::CONTENT_TYPE, content_type.clone())],
                body.clone(),
            );
            async move { response }
        })
    }

    /// Responds with `status_code` and `content` encoded as JSON.
    ///
    /// Content that cannot be encoded is a fatal setup defect; nothing is registered then.
    pub fn with_json<T: Serialize + ?Sized>(self, status_code: u16, content: &T) -> &'a MockHost {
        match serde_json::to_vec(content) {
            Ok(body) => self.with_body(status_code, body, CONTENT_TYPE_JSON),
            Err(e) => {
                self.host.reporter().fatal(&format!(
                    "failed to encode JSON stub for {}: {}",
                    self.call, e
                ));
                self.host
            }
        }
    }

    fn status(&self, status_code: u16) -> Option<StatusCode> {
        match StatusCode::from_u16(status_code) {
            Ok(status) => Some(status),
            Err(e) => {
                self.host.reporter().fatal(&format!(
                    "invalid status code {} for stub {}: {}",
                    status_code, self.call, e
                ));
                None
            }
        }
    }
}
