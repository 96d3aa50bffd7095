//! mock_api library: a programmatic HTTP test double
//!
//! Start a [`MockHost`], stub the endpoints the code under test calls, point
//! that code at [`MockHost::url`], then verify what it sent. Every request the
//! server receives is recorded, stubbed or not; an endpoint that was never
//! stubbed answers 404 and fails the test.
//!
//! # Example
//!
//! ```no_run
//! use mock_api::MockHost;
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let api = MockHost::new();
//! api.stub("POST", "/users").with_json(201, &json!({"id": 7}));
//!
//! let client = reqwest::Client::new();
//! client
//!     .post(api.url_for("/users?notify=true"))
//!     .bearer_auth("token")
//!     .json(&json!({"name": "ada"}))
//!     .send()
//!     .await
//!     .unwrap();
//!
//! let call = api.verify("POST", "/users").has_been_called_once().unwrap();
//! call.with_bearer_auth_header("token")
//!     .with_query_value("notify", "true")
//!     .with_string_payload(r#"{"name":"ada"}"#);
//! # }
//! ```
//!
//! # Failures
//!
//! Mismatched assertions are recoverable: they are reported and the chain
//! goes on. Setup defects (an unstubbed endpoint being called, a wrong call
//! count, an undecodable JSON payload) are fatal. Both go through the host's
//! [`FailureReporter`]; the default [`StandardReporter`] turns them into test
//! panics.
//!
//! # Requirements
//!
//! Each host runs its own Tokio runtime on a background thread, so hosts can
//! be used from plain `#[test]` functions as well as from `#[tokio::test]`.

#![warn(missing_docs)]

mod call;
pub mod config;
mod error_handling;
mod host;
pub mod initialization;
mod invocation;
mod ledger;
mod reporter;
mod stub;
mod verify;

// Re-export public API
pub use call::CallSignature;
pub use config::{LogFormat, LogLevel, MockHostConfig};
pub use error_handling::{InitializationError, MockHostError};
pub use host::MockHost;
pub use invocation::{Invocation, InvocationRequestForm, Values};
pub use ledger::InvocationLedger;
pub use reporter::{Failure, FailureLevel, FailureReporter, RecordingReporter, StandardReporter};
pub use stub::{StubBuilder, StubHandler, StubRegistry};
pub use verify::CallVerifier;
