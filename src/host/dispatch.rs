//! The single request handler behind every host.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Router;

use super::HostState;
use crate::call::CallSignature;
use crate::invocation::Invocation;
use crate::reporter::FailureReporter;

/// Router sending every method and path to [`dispatch`].
pub(crate) fn router(state: Arc<HostState>) -> Router {
    Router::new().fallback(dispatch).with_state(state)
}

/// Records the request, then answers it with the stub registered for its
/// signature, or with an empty 404 and a fatal report when there is none.
async fn dispatch(State(state): State<Arc<HostState>>, request: Request) -> Response {
    let call = CallSignature::from(&request);
    log::debug!(
        "received {} (query: {})",
        call,
        request.uri().query().unwrap_or_default()
    );

    let (invocation, request) = capture(request, &state.reporter).await;
    state.ledger.record(call.clone(), Arc::new(invocation));

    match state.registry.lookup(&call) {
        Some(handler) => handler(request).await,
        None => {
            log::warn!("unmocked invocation {}", call);
            report_fatal(
                state.reporter.as_ref(),
                &format!("unmocked invocation {} {}", call.method(), call.path()),
            );
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// Reads the whole body once, returning the recorded invocation and an
/// equivalent request whose body replays the same bytes.
pub(crate) async fn capture(
    request: Request,
    reporter: &Arc<dyn FailureReporter>,
) -> (Invocation, Request) {
    let (parts, body) = request.into_parts();
    let payload = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(payload) => payload,
        Err(e) => {
            report_fatal(
                reporter.as_ref(),
                &format!("failed to read body of {} {}: {}", parts.method, parts.uri, e),
            );
            Bytes::new()
        }
    };

    let mut recorded = axum::http::Request::new(payload.clone());
    *recorded.method_mut() = parts.method.clone();
    *recorded.uri_mut() = parts.uri.clone();
    *recorded.version_mut() = parts.version;
    *recorded.headers_mut() = parts.headers.clone();

    let replay = Request::from_parts(parts, Body::from(payload));
    (Invocation::new(recorded, Arc::clone(reporter)), replay)
}

/// Reports a fatal failure from a server task.
///
/// A reporter that unwinds must not take the connection down with it: the
/// client still gets its response.
fn report_fatal(reporter: &dyn FailureReporter, message: &str) {
    if panic::catch_unwind(AssertUnwindSafe(|| reporter.fatal(message))).is_err() {
        log::debug!("fatal report unwound on the server side: {}", message);
    }
}
