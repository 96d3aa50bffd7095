//! Recorded requests and the assertions available on them.
//!
//! An [`Invocation`] is captured once per request received by the mock. Every
//! assertion either passes silently or reports a recoverable failure through
//! the host's reporter, then returns the invocation so further checks can be
//! chained. Only [`Invocation::read_json_payload`] reports fatally.

mod form;
mod values;

use std::fmt;
use std::sync::Arc;

use axum::body::Bytes;
use axum::http::Request;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;

use crate::config::{
    AUTH_SCHEME_BASIC, AUTH_SCHEME_BEARER, CONTENT_TYPE_FORM, HEADER_AUTHORIZATION,
    HEADER_CONTENT_TYPE,
};
use crate::reporter::FailureReporter;

pub use form::InvocationRequestForm;
pub use values::Values;

/// A single request received by the mock server.
pub struct Invocation {
    request: Request<Bytes>,
    reporter: Arc<dyn FailureReporter>,
}

impl Invocation {
    /// Wraps an already captured request. The request body is the exact payload.
    pub fn new(request: Request<Bytes>, reporter: Arc<dyn FailureReporter>) -> Self {
        Self { request, reporter }
    }

    /// The captured request: method, URI, version, headers and body.
    pub fn request(&self) -> &Request<Bytes> {
        &self.request
    }

    /// The exact bytes of the request body.
    pub fn payload(&self) -> &[u8] {
        self.request.body()
    }

    pub(crate) fn reporter(&self) -> &dyn FailureReporter {
        self.reporter.as_ref()
    }

    /// Asserts the header carries exactly `expected`, in order.
    ///
    /// An empty `expected` asserts the header is absent.
    pub fn with_header(&self, name: &str, expected: &[&str]) -> &Self {
        let actual = self.header_values(name);
        if actual != expected {
            self.reporter.error(&format!(
                "header '{}': expected {:?}, got {:?}",
                name, expected, actual
            ));
        }
        self
    }

    /// Asserts the header is not present at all.
    pub fn without_header(&self, name: &str) -> &Self {
        let actual = self.header_values(name);
        if !actual.is_empty() {
            self.reporter.error(&format!(
                "header '{}' found where it was expected not to: {:?}",
                name, actual
            ));
        }
        self
    }

    /// Asserts `Authorization: <scheme> <value>`.
    pub fn with_auth_header(&self, scheme: &str, value: &str) -> &Self {
        let credentials = format!("{} {}", scheme, value);
        self.with_header(HEADER_AUTHORIZATION, &[credentials.as_str()])
    }

    /// Asserts HTTP Basic credentials for `username` and `password`.
    pub fn with_basic_auth_header(&self, username: &str, password: &str) -> &Self {
        let credentials = STANDARD.encode(format!("{}:{}", username, password));
        self.with_auth_header(AUTH_SCHEME_BASIC, &credentials)
    }

    /// Asserts a bearer token.
    pub fn with_bearer_auth_header(&self, token: &str) -> &Self {
        self.with_auth_header(AUTH_SCHEME_BEARER, token)
    }

    /// Asserts the body equals `expected` byte for byte.
    pub fn with_payload(&self, expected: &[u8]) -> &Self {
        if self.payload() != expected {
            self.reporter.error(&format!(
                "payload: expected {:?}, got {:?}",
                expected,
                self.payload()
            ));
        }
        self
    }

    /// Asserts the body is exactly the UTF-8 encoding of `expected`.
    pub fn with_string_payload(&self, expected: &str) -> &Self {
        if self.payload() != expected.as_bytes() {
            self.reporter.error(&format!(
                "payload: expected {:?}, got {:?}",
                expected,
                String::from_utf8_lossy(self.payload())
            ));
        }
        self
    }

    /// Decodes the body as JSON.
    ///
    /// A body that does not decode into `T` is fatal: nothing meaningful can
    /// be asserted on it. Returns `None` in that case if the reporter did not
    /// stop the test.
    pub fn read_json_payload<T: DeserializeOwned>(&self) -> Option<T> {
        match serde_json::from_slice(self.payload()) {
            Ok(value) => Some(value),
            Err(e) => {
                self.reporter
                    .fatal(&format!("failed to decode JSON payload: {}", e));
                None
            }
        }
    }

    /// Asserts the body is a URL-encoded form and returns it for further checks.
    ///
    /// A wrong `Content-Type`, a malformed `%` escape or a body that is not
    /// UTF-8 text is a recoverable failure; the returned form is then whatever
    /// could be decoded (possibly empty).
    pub fn with_url_encoded_form_payload(&self) -> InvocationRequestForm<'_> {
        self.with_header(HEADER_CONTENT_TYPE, &[CONTENT_TYPE_FORM]);
        let values = match std::str::from_utf8(self.payload()) {
            Ok(text) => {
                for offset in values::invalid_escapes(self.payload()) {
                    let escape: String = text
                        .get(offset..)
                        .unwrap_or_default()
                        .chars()
                        .take(3)
                        .take_while(|c| *c != '&')
                        .collect();
                    self.reporter.error(&format!(
                        "form payload: invalid escape {:?} at byte {}",
                        escape, offset
                    ));
                }
                Values::parse(self.payload())
            }
            Err(e) => {
                self.reporter
                    .error(&format!("form payload is not valid UTF-8: {}", e));
                Values::default()
            }
        };
        InvocationRequestForm::new(self, values)
    }

    /// Decoded query string of the request URI.
    pub fn query(&self) -> Values {
        Values::parse(self.request.uri().query().unwrap_or_default().as_bytes())
    }

    /// Asserts the query parameter `name` is present with `value`.
    pub fn with_query_value(&self, name: &str, value: &str) -> &Self {
        self.check_query_value(&self.query(), name, value);
        self
    }

    /// Asserts every expected query parameter is present with its value.
    /// Extra parameters are allowed.
    pub fn with_query_values<I, K, V>(&self, expected: I) -> &Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let query = self.query();
        for (name, value) in form::sorted(expected) {
            self.check_query_value(&query, &name, &value);
        }
        self
    }

    /// Asserts the query parameters are exactly the expected ones: each present
    /// with its value and nothing else. Every violation is reported.
    pub fn with_query_values_exactly<I, K, V>(&self, expected: I) -> &Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let query = self.query();
        let expected = form::sorted(expected);
        for (name, value) in &expected {
            self.check_query_value(&query, name, value);
        }
        for name in query.keys().filter(|name| !expected.contains_key(*name)) {
            self.reporter
                .error(&format!("query parameter '{}' not expected", name));
        }
        self
    }

    fn check_query_value(&self, query: &Values, name: &str, expected: &str) {
        match query.get(name) {
            Some(actual) if actual == expected => {}
            Some(actual) => self.reporter.error(&format!(
                "query parameter '{}': expected {:?}, got {:?}",
                name, expected, actual
            )),
            None => self
                .reporter
                .error(&format!("query parameter '{}' not found", name)),
        }
    }

    fn header_values(&self, name: &str) -> Vec<String> {
        self.request
            .headers()
            .get_all(name)
            .iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .collect()
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("method", self.request.method())
            .field("uri", self.request.uri())
            .field("headers", self.request.headers())
            .field("payload_len", &self.payload().len())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::RecordingReporter;
    use serde::Deserialize;
    use std::collections::HashMap;

    pub(crate) fn invocation_with(
        reporter: &Arc<RecordingReporter>,
        body: &str,
        content_type: Option<&str>,
    ) -> Invocation {
        let mut builder = Request::builder().method("POST").uri("/endpoint");
        if let Some(content_type) = content_type {
            builder = builder.header(HEADER_CONTENT_TYPE, content_type);
        }
        let request = builder
            .body(Bytes::copy_from_slice(body.as_bytes()))
            .unwrap();
        Invocation::new(request, reporter.clone())
    }

    fn get_invocation(
        reporter: &Arc<RecordingReporter>,
        uri: &str,
        headers: &[(&str, &str)],
    ) -> Invocation {
        let mut builder = Request::builder().method("GET").uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        Invocation::new(builder.body(Bytes::new()).unwrap(), reporter.clone())
    }

    fn reporter() -> Arc<RecordingReporter> {
        Arc::new(RecordingReporter::new())
    }

    #[test]
    fn test_request_and_payload_are_exposed() {
        let reporter = reporter();
        let invocation = invocation_with(&reporter, "*", None);

        assert_eq!(invocation.request().method(), "POST");
        assert_eq!(invocation.request().uri().path(), "/endpoint");
        assert_eq!(invocation.payload(), [42]);
    }

    #[test]
    fn test_chaining_verifications() {
        let reporter = reporter();
        let request = Request::builder()
            .method("POST")
            .uri("/endpoint")
            .header("foo", "bar")
            .body(Bytes::from_static(&[42]))
            .unwrap();
        let invocation = Invocation::new(request, reporter.clone());

        invocation
            .with_header("foo", &["bar"])
            .with_payload(&[42])
            .without_header("dummy")
            .with_header("foo", &["bar"]);

        reporter.assert_no_failures();
    }

    #[test]
    fn test_with_header_pass() {
        let reporter = reporter();
        let invocation = get_invocation(&reporter, "/endpoint", &[("foo", "bar")]);

        invocation.with_header("foo", &["bar"]);
        // Header names are case-insensitive
        invocation.with_header("FOO", &["bar"]);

        reporter.assert_no_failures();
    }

    #[test]
    fn test_with_header_multiple_values_pass() {
        let reporter = reporter();
        let invocation =
            get_invocation(&reporter, "/endpoint", &[("foo", "bar1"), ("foo", "bar2")]);

        invocation.with_header("foo", &["bar1", "bar2"]);

        reporter.assert_no_failures();
    }

    #[test]
    fn test_with_header_fail_when_missing() {
        let reporter = reporter();
        let invocation = get_invocation(&reporter, "/endpoint", &[]);

        invocation.with_header("foo", &["bar"]);

        assert_eq!(reporter.errors().len(), 1);
        assert!(reporter.errors()[0].contains("header 'foo'"));
    }

    #[test]
    fn test_with_header_fail_on_wrong_value() {
        let reporter = reporter();
        let invocation = get_invocation(&reporter, "/endpoint", &[("foo", "bar")]);

        invocation.with_header("foo", &["notbar"]);

        assert!(reporter.has_errors());
    }

    #[test]
    fn test_with_header_fail_on_partial_values() {
        let reporter = reporter();
        let invocation =
            get_invocation(&reporter, "/endpoint", &[("foo", "bar1"), ("foo", "bar2")]);

        invocation.with_header("foo", &["bar1"]);

        assert!(reporter.has_errors());
    }

    #[test]
    fn test_with_header_is_order_sensitive() {
        let reporter = reporter();
        let invocation =
            get_invocation(&reporter, "/endpoint", &[("foo", "bar1"), ("foo", "bar2")]);

        invocation.with_header("foo", &["bar2", "bar1"]);

        assert!(reporter.has_errors());
    }

    #[test]
    fn test_without_header() {
        let reporter = reporter();
        let invocation = get_invocation(&reporter, "/endpoint", &[("foo", "bar")]);

        invocation.without_header("dummy");
        reporter.assert_no_failures();

        invocation.without_header("foo");
        assert_eq!(reporter.errors().len(), 1);
        assert!(reporter.errors()[0].contains("'foo'"));
    }

    #[test]
    fn test_auth_headers() {
        let reporter = reporter();
        let invocation = get_invocation(
            &reporter,
            "/endpoint",
            &[("Authorization", "Basic dXNlcjpwYXNz")],
        );

        invocation
            .with_basic_auth_header("user", "pass")
            .with_auth_header("Basic", "dXNlcjpwYXNz");
        reporter.assert_no_failures();

        invocation.with_bearer_auth_header("dXNlcjpwYXNz");
        assert_eq!(reporter.errors().len(), 1);
    }

    #[test]
    fn test_bearer_auth_header() {
        let reporter = reporter();
        let invocation = get_invocation(
            &reporter,
            "/endpoint",
            &[("Authorization", "Bearer token-123")],
        );

        invocation.with_bearer_auth_header("token-123");
        reporter.assert_no_failures();

        invocation.with_bearer_auth_header("other");
        assert!(reporter.has_errors());
    }

    #[test]
    fn test_with_payload() {
        let reporter = reporter();
        let invocation = invocation_with(&reporter, "foo", None);

        invocation.with_payload(b"foo");
        reporter.assert_no_failures();

        invocation.with_payload(b"fo");
        assert!(reporter.has_errors());
    }

    #[test]
    fn test_with_string_payload() {
        let reporter = reporter();
        let invocation = invocation_with(&reporter, "foo", None);

        invocation.with_string_payload("foo");
        reporter.assert_no_failures();

        invocation.with_string_payload("notfoo");
        assert!(reporter.has_errors());
        assert!(!reporter.has_fatals());
    }

    #[test]
    fn test_with_string_payload_compares_raw_bytes() {
        let reporter = reporter();
        let request = Request::builder()
            .method("POST")
            .uri("/endpoint")
            .body(Bytes::from_static(&[0xff]))
            .unwrap();
        let invocation = Invocation::new(request, reporter.clone());

        // Lossy decoding would turn 0xff into U+FFFD and wrongly match
        invocation.with_string_payload("\u{FFFD}");

        assert_eq!(reporter.errors().len(), 1);
        assert!(!reporter.has_fatals());
    }

    #[derive(Deserialize)]
    struct Foo {
        foo: String,
    }

    #[test]
    fn test_read_json_payload() {
        let reporter = reporter();
        let invocation = invocation_with(&reporter, r#"{"foo":"bar"}"#, None);

        let json: Foo = invocation.read_json_payload().unwrap();

        assert_eq!(json.foo, "bar");
        reporter.assert_no_failures();
    }

    #[test]
    fn test_read_json_payload_invalid_is_fatal() {
        let reporter = reporter();
        let invocation = invocation_with(&reporter, r#"{"invalid json"}"#, None);

        let json: Option<Foo> = invocation.read_json_payload();

        assert!(json.is_none());
        assert!(reporter.has_fatals());
        assert!(!reporter.has_errors());
    }

    #[test]
    fn test_form_requires_content_type() {
        let reporter = reporter();
        let invocation = invocation_with(&reporter, "key1=value1&key2=value+2%21", None);

        let form = invocation.with_url_encoded_form_payload();

        assert!(reporter.has_errors());
        assert!(!reporter.has_fatals());
        // The form is still usable
        assert_eq!(form.get("key1"), Some("value1"));
    }

    #[test]
    fn test_form_reports_each_invalid_escape() {
        let reporter = reporter();
        let invocation = invocation_with(&reporter, "a=%zz&b=%&c=%41", Some(CONTENT_TYPE_FORM));

        let form = invocation.with_url_encoded_form_payload();

        assert_eq!(
            reporter.errors(),
            vec![
                "form payload: invalid escape \"%zz\" at byte 2",
                "form payload: invalid escape \"%\" at byte 8",
            ]
        );
        assert!(!reporter.has_fatals());
        // Best-effort view of the body is still returned
        assert_eq!(form.get("a"), Some("%zz"));
        assert_eq!(form.get("c"), Some("A"));
    }

    #[test]
    fn test_form_rejects_non_utf8_payload() {
        let reporter = reporter();
        let request = Request::builder()
            .method("POST")
            .uri("/endpoint")
            .header(HEADER_CONTENT_TYPE, CONTENT_TYPE_FORM)
            .body(Bytes::from_static(&[0xff, 0xfe]))
            .unwrap();
        let invocation = Invocation::new(request, reporter.clone());

        let form = invocation.with_url_encoded_form_payload();

        assert!(form.values().is_empty());
        assert_eq!(reporter.errors().len(), 1);
    }

    #[test]
    fn test_with_query_value() {
        let reporter = reporter();
        let invocation = get_invocation(&reporter, "/e?a=1&b=2", &[]);

        invocation.with_query_value("a", "1").with_query_value("b", "2");
        reporter.assert_no_failures();

        invocation.with_query_value("a", "2");
        invocation.with_query_value("c", "3");
        let errors = reporter.errors();
        assert_eq!(errors.len(), 2);
        assert!(errors[1].contains("query parameter 'c' not found"));
    }

    #[test]
    fn test_with_query_values_reports_each_missing_key() {
        let reporter = reporter();
        let invocation = get_invocation(&reporter, "/e?a=1", &[]);

        invocation.with_query_values([("a", "1"), ("b", "2"), ("c", "3")]);

        assert_eq!(
            reporter.errors(),
            vec![
                "query parameter 'b' not found",
                "query parameter 'c' not found"
            ]
        );
    }

    #[test]
    fn test_with_query_values_allows_extra_keys() {
        let reporter = reporter();
        let invocation = get_invocation(&reporter, "/e?a=1&b=2", &[]);

        invocation.with_query_values(HashMap::from([("a", "1")]));

        reporter.assert_no_failures();
    }

    #[test]
    fn test_with_query_values_exactly() {
        let reporter = reporter();
        let invocation = get_invocation(&reporter, "/e?a=1&b=2", &[]);
        invocation.with_query_values_exactly([("a", "1"), ("b", "2")]);
        reporter.assert_no_failures();

        let reporter = self::reporter();
        let invocation = get_invocation(&reporter, "/e?a=1&b=2", &[]);
        invocation.with_query_values_exactly([("a", "1")]);
        assert_eq!(reporter.errors(), vec!["query parameter 'b' not expected"]);

        let reporter = self::reporter();
        let invocation = get_invocation(&reporter, "/e?a=1&b=2", &[]);
        invocation.with_query_values_exactly([("a", "1"), ("b", "3")]);
        assert_eq!(reporter.errors().len(), 1);
    }

    #[test]
    fn test_with_query_values_exactly_reports_every_violation() {
        let reporter = reporter();
        let invocation = get_invocation(&reporter, "/e?a=2&x=1&y=1", &[]);

        invocation.with_query_values_exactly([("a", "1"), ("b", "2")]);

        // a mismatched, b missing, x and y unexpected
        assert_eq!(reporter.errors().len(), 4);
    }

    #[test]
    fn test_query_without_query_string() {
        let reporter = reporter();
        let invocation = get_invocation(&reporter, "/e", &[]);

        assert!(invocation.query().is_empty());
        invocation.with_query_values_exactly(Vec::<(&str, &str)>::new());
        reporter.assert_no_failures();
    }
}
