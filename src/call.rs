//! Endpoint identity.

use std::fmt;

/// Identifies an endpoint of the mock by method and path.
///
/// The method is stored lowercase so `GET`, `get` and `Get` share a signature.
/// The path never contains a query string: routing ignores query parameters,
/// they are asserted on the recorded [`crate::Invocation`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallSignature {
    method: String,
    path: String,
}

impl CallSignature {
    /// Builds a signature, lowercasing the method and dropping any `?query` suffix.
    pub fn new(method: &str, path: &str) -> Self {
        let path = path.split_once('?').map_or(path, |(path, _)| path);
        Self {
            method: method.to_ascii_lowercase(),
            path: path.to_string(),
        }
    }

    /// Lowercase HTTP method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Request path without query string.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl From<&axum::http::Request<axum::body::Body>> for CallSignature {
    fn from(request: &axum::http::Request<axum::body::Body>) -> Self {
        Self::new(request.method().as_str(), request.uri().path())
    }
}

impl fmt::Display for CallSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}
