//! Read-only request facade.
//!
//! [`JsonRequest`] is the only view of the inbound HTTP request the pipeline
//! needs: method, path, headers, body and the decoded query parameters. It is
//! built once per request from an [`http::Request`] and never mutated.

use bytes::Bytes;
use http::{HeaderMap, Method, Uri};

/// Query parameter names the pipeline itself reacts to.
///
/// Any other parameter is left for handlers and `serialize` implementations.
pub mod params {
    /// `format=jsonp` selects JSONP encoding.
    pub const FORMAT: &str = "format";

    /// Per-request JSONP callback name.
    pub const CALLBACK: &str = "callback";

    /// Truthy value enables pretty-printing.
    pub const DEBUG: &str = "debug";

    /// Alias of [`DEBUG`].
    pub const DECODE: &str = "decode";

    /// Truthy value lets handler failures propagate instead of rendering them.
    pub const RAISE: &str = "raise";
}

/// Returns `true` for the query values treated as "on": `1`, `true`, `t`, `on`
/// (case-insensitive).
///
/// # Example
///
/// ```
/// use jsonresponse_core::request::is_truthy;
///
/// assert!(is_truthy("1"));
/// assert!(is_truthy("TRUE"));
/// assert!(is_truthy("on"));
/// assert!(!is_truthy("0"));
/// assert!(!is_truthy("yes"));
/// ```
#[must_use]
pub fn is_truthy(value: &str) -> bool {
    ["1", "true", "t", "on"]
        .iter()
        .any(|candidate| value.trim().eq_ignore_ascii_case(candidate))
}

/// Request facade handed to handlers and to `serialize` implementations.
///
/// # Example
///
/// ```
/// use http::{Method, Uri};
/// use jsonresponse_core::JsonRequest;
///
/// let request = JsonRequest::from_uri(
///     Method::GET,
///     Uri::from_static("/users?with_age=1&format=jsonp&callback=cb"),
/// );
///
/// assert_eq!(request.path(), "/users");
/// assert_eq!(request.query("callback"), Some("cb"));
/// assert!(request.flag("with_age"));
/// assert!(request.wants_jsonp());
/// ```
#[derive(Debug, Clone)]
pub struct JsonRequest {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    query: Vec<(String, String)>,
}

impl JsonRequest {
    /// Creates a request facade from its parts.
    #[must_use]
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        let query = parse_query(uri.query());
        Self {
            method,
            uri,
            headers,
            body,
            query,
        }
    }

    /// Creates a bodyless request with no headers.
    #[must_use]
    pub fn from_uri(method: Method, uri: Uri) -> Self {
        Self::new(method, uri, HeaderMap::new(), Bytes::new())
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the path portion of the URI.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the raw request body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the raw query string, if present.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Returns a query parameter by name.
    ///
    /// When a name is repeated the last occurrence wins.
    #[must_use]
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns every value of a repeated query parameter, in order.
    pub fn query_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.query
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns all decoded query pairs in request order.
    #[must_use]
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Returns `true` if the parameter is present with a truthy value.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.query(name).is_some_and(is_truthy)
    }

    /// Returns `true` if `debug` or `decode` asks for pretty output.
    #[must_use]
    pub fn wants_pretty(&self) -> bool {
        self.flag(params::DEBUG) || self.flag(params::DECODE)
    }

    /// Returns `true` if `format=jsonp` was requested.
    #[must_use]
    pub fn wants_jsonp(&self) -> bool {
        self.query(params::FORMAT) == Some("jsonp")
    }

    /// Returns the non-empty `callback` parameter, if any.
    #[must_use]
    pub fn callback(&self) -> Option<&str> {
        self.query(params::CALLBACK).filter(|name| !name.is_empty())
    }

    /// Returns `true` if `raise` asks failures to propagate.
    ///
    /// Accepts any truthy value or any non-zero integer.
    #[must_use]
    pub fn wants_raise(&self) -> bool {
        self.query(params::RAISE).is_some_and(|value| {
            is_truthy(value) || value.trim().parse::<i64>().is_ok_and(|n| n != 0)
        })
    }
}

impl<B: Into<Bytes>> From<http::Request<B>> for JsonRequest {
    fn from(request: http::Request<B>) -> Self {
        let (parts, body) = request.into_parts();
        Self::new(parts.method, parts.uri, parts.headers, body.into())
    }
}

fn parse_query(query: Option<&str>) -> Vec<(String, String)> {
    let Some(query) = query else {
        return Vec::new();
    };

    serde_urlencoded::from_str(query).unwrap_or_else(|err| {
        tracing::debug!(error = %err, "ignoring undecodable query string");
        Vec::new()
    })
}
