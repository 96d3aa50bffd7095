//! HTTP header and content-type constants.

/// Authorization header
pub const HEADER_AUTHORIZATION: &str = "Authorization";
/// Content-Type header
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";

/// Authorization scheme for HTTP Basic credentials
pub const AUTH_SCHEME_BASIC: &str = "Basic";
/// Authorization scheme for bearer tokens
pub const AUTH_SCHEME_BEARER: &str = "Bearer";

/// Content type written by JSON stubs
pub const CONTENT_TYPE_JSON: &str = "application/json";
/// Content type expected on URL-encoded form payloads
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";
