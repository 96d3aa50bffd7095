//! Stubbed endpoints.
//!
//! The [`StubRegistry`] maps each call signature to the handler producing its
//! response; [`StubBuilder`] is the fluent way to fill it.

mod builder;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use axum::extract::Request;
use axum::response::Response;
use futures::future::BoxFuture;

use crate::call::CallSignature;

pub use builder::StubBuilder;

/// Type-erased response handler of a stubbed endpoint.
///
/// It receives the live request (with a fresh body holding the captured
/// payload) and is solely responsible for the response.
pub type StubHandler = Arc<dyn Fn(Request) -> BoxFuture<'static, Response> + Send + Sync>;

/// Handlers by call signature. One handler per signature; registering again replaces it.
#[derive(Default)]
pub struct StubRegistry {
    handlers: RwLock<HashMap<CallSignature, StubHandler>>,
}

impl StubRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `call`, replacing any previous one.
    pub fn register(&self, call: CallSignature, handler: StubHandler) {
        let replaced = self
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(call.clone(), handler)
            .is_some();
        if replaced {
            log::debug!("stub for {} replaced", call);
        } else {
            log::debug!("stub for {} registered", call);
        }
    }

    /// Handler registered for `call`, if any.
    ///
    /// The handler is cloned out so the lock is released before it runs.
    pub fn lookup(&self, call: &CallSignature) -> Option<StubHandler> {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(call)
            .cloned()
    }

    /// Whether a handler is registered for `call`.
    pub fn contains(&self, call: &CallSignature) -> bool {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(call)
    }
}

impl fmt::Debug for StubRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        let mut calls: Vec<_> = handlers.keys().collect();
        calls.sort();
        f.debug_struct("StubRegistry").field("calls", &calls).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use futures::FutureExt;

    fn status_handler(status: StatusCode) -> StubHandler {
        Arc::new(move |_request: Request| async move { status.into_response() }.boxed())
    }

    fn request() -> Request {
        Request::builder().uri("/x").body(Body::empty()).unwrap()
    }

    #[test]
    fn test_lookup_missing() {
        let registry = StubRegistry::new();
        let call = CallSignature::new("get", "/x");
        assert!(registry.lookup(&call).is_none());
        assert!(!registry.contains(&call));
    }

    #[tokio::test]
    async fn test_last_registration_wins() {
        let registry = StubRegistry::new();
        let call = CallSignature::new("get", "/x");

        registry.register(call.clone(), status_handler(StatusCode::OK));
        registry.register(call.clone(), status_handler(StatusCode::ACCEPTED));

        let handler = registry.lookup(&call).expect("handler registered");
        let response = handler(request()).await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[test]
    fn test_signatures_are_independent() {
        let registry = StubRegistry::new();
        registry.register(
            CallSignature::new("GET", "/x"),
            status_handler(StatusCode::OK),
        );

        assert!(registry.contains(&CallSignature::new("get", "/x")));
        assert!(!registry.contains(&CallSignature::new("post", "/x")));
        assert!(!registry.contains(&CallSignature::new("get", "/y")));
        assert_eq!(
            format!("{:?}", registry),
            "StubRegistry { calls: [CallSignature { method: \"get\", path: \"/x\" }] }"
        );
    }
}
