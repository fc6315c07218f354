//! Context passed to every `serialize` call.

use http::Method;

use crate::JsonRequest;

/// Read-only context for [`Serializable::serialize`](crate::Serializable::serialize).
///
/// Gives domain objects access to the inbound request so their rendering can
/// depend on caller-defined query parameters.
///
/// # Example
///
/// ```
/// use http::{Method, Uri};
/// use jsonresponse_core::{JsonRequest, SerializeContext};
///
/// let request = JsonRequest::from_uri(Method::GET, Uri::from_static("/users?with_age=1"));
/// let ctx = SerializeContext::new(&request);
///
/// assert!(ctx.flag("with_age"));
/// assert_eq!(ctx.param("with_age"), Some("1"));
/// assert_eq!(ctx.param("missing"), None);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SerializeContext<'a> {
    request: &'a JsonRequest,
}

impl<'a> SerializeContext<'a> {
    /// Creates a context for the given request.
    #[must_use]
    pub fn new(request: &'a JsonRequest) -> Self {
        Self { request }
    }

    /// Returns the underlying request facade.
    #[must_use]
    pub fn request(&self) -> &'a JsonRequest {
        self.request
    }

    /// Returns a query parameter by name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&'a str> {
        self.request.query(name)
    }

    /// Returns `true` if the query parameter is present and truthy.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.request.flag(name)
    }

    /// Returns the request method.
    #[must_use]
    pub fn method(&self) -> &'a Method {
        self.request.method()
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &'a str {
        self.request.path()
    }
}
