//! Minimal request model
//!
//! The event transport (edge function invocation, request object shapes)
//! is an external collaborator; routing only needs the URI and a handful
//! of headers, so requests are constructed from parts.

use std::collections::BTreeMap;

/// An incoming request as the routing core sees it
///
/// Header keys are stored lowercase so lookups are case-insensitive.
///
/// # Examples
///
/// ```
/// use caret_edge::EdgeRequest;
///
/// let request = EdgeRequest::new("/terms?ref=home")
///     .with_header("Host", "example.com")
///     .with_header("Accept-Language", "fr;q=0.9, en;q=0.8");
///
/// assert_eq!(request.path(), "/terms");
/// assert_eq!(request.querystring(), Some("ref=home"));
/// assert_eq!(request.host(), Some("example.com"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeRequest {
    pub uri: String,
    headers: BTreeMap<String, String>,
}

impl EdgeRequest {
    /// Creates a request from a URI (path plus optional query string)
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            headers: BTreeMap::new(),
        }
    }

    /// Adds a header (builder style); keys are lowercased on insert
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into().to_lowercase(), value.into());
        self
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    /// The `Host` header
    pub fn host(&self) -> Option<&str> {
        self.header("host")
    }

    /// The `Accept-Language` header
    pub fn accept_language(&self) -> Option<&str> {
        self.header("accept-language")
    }

    /// The `Authorization` header
    pub fn authorization(&self) -> Option<&str> {
        self.header("authorization")
    }

    /// URI path without the query string
    pub fn path(&self) -> &str {
        self.uri.split('?').next().unwrap_or(&self.uri)
    }

    /// Query string, if any
    pub fn querystring(&self) -> Option<&str> {
        self.uri.split_once('?').map(|(_, q)| q)
    }
}
