//! Error types for the response pipeline.
//!
//! [`HandlerError`] is the failure a handler (or a [`Serializable`](crate::Serializable)
//! implementation) hands back. The pipeline classifies it into a
//! [`Failure`](crate::Failure) with an `err_class` / `err_desc` pair.
//!
//! The remaining errors are setup and rendering errors that never reach the
//! client as a JSON document.

use std::borrow::Cow;

use http::StatusCode;
use thiserror::Error;

/// Result type alias using [`HandlerError`].
pub type HandlerResult<T> = Result<T, HandlerError>;

/// Returns `true` for statuses a failure document may carry (4xx and 5xx).
#[must_use]
pub fn is_failure_status(status: StatusCode) -> bool {
    status.is_client_error() || status.is_server_error()
}

/// Kind reported for polymorphic objects found where no resolution happens.
pub(crate) const NOT_JSON_SAFE_KIND: &str = "jsonresponse::NotJsonSafe";

/// A failure raised by a handler or by a `serialize` capability.
///
/// Carries the `kind` that is rendered as `err_class` and the `message` that
/// is rendered as `err_desc`. The optional `source` is logged but never
/// rendered.
///
/// # Example
///
/// ```
/// use jsonresponse_core::HandlerError;
///
/// let err = HandlerError::new("Exception", "Wooot!??");
/// assert_eq!(err.kind(), "Exception");
/// assert_eq!(err.message(), "Wooot!??");
/// assert!(err.status().is_none());
///
/// let parse = "abc".parse::<u32>().unwrap_err();
/// let err = HandlerError::from_error(parse);
/// assert!(err.kind().ends_with("ParseIntError"));
/// ```
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct HandlerError {
    kind: Cow<'static, str>,
    message: String,
    status: Option<StatusCode>,
    #[source]
    source: Option<anyhow::Error>,
}

impl HandlerError {
    /// Creates an error with an explicit kind and message.
    #[must_use]
    pub fn new(kind: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Creates a "resource does not exist" error, rendered with status 404.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NotFound", message).with_status(StatusCode::NOT_FOUND)
    }

    /// Classifies any standard error by its fully qualified type name.
    #[must_use]
    pub fn from_error<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            kind: Cow::Borrowed(std::any::type_name::<E>()),
            message: err.to_string(),
            status: None,
            source: Some(anyhow::Error::new(err)),
        }
    }

    pub(crate) fn not_json_safe(type_name: &str) -> Self {
        Self::new(
            NOT_JSON_SAFE_KIND,
            format!("object of type {type_name} is not JSON serializable"),
        )
    }

    /// Overrides the HTTP status used when this error is rendered.
    ///
    /// Only 4xx and 5xx statuses are accepted; anything else is ignored and
    /// the view's failure status applies.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        if is_failure_status(status) {
            self.status = Some(status);
        } else {
            tracing::warn!(status = status.as_u16(), "ignoring non-error status on handler error");
        }
        self
    }

    /// Attaches an underlying cause for logging.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the error kind (rendered as `err_class`).
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the human-readable description (rendered as `err_desc`).
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the status override, if any.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Returns the underlying cause, if any.
    #[must_use]
    pub fn cause(&self) -> Option<&anyhow::Error> {
        self.source.as_ref()
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        Self::from_error(err)
    }
}

/// Error raised when a view is configured with an unknown strategy name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StrategyError {
    /// The strategy name is not one of `plain`, `api` or `objects`.
    #[error("unknown format strategy: {name} (expected one of: plain, api, objects)")]
    Unknown {
        /// The rejected name.
        name: String,
    },
}

/// Error raised while rendering a document to text.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// JSON serialization failed.
    #[error("failed to encode document as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_error() {
        let err = HandlerError::new("Exception", "boom");
        assert_eq!(err.kind(), "Exception");
        assert_eq!(err.message(), "boom");
        assert_eq!(err.to_string(), "Exception: boom");
        assert!(err.cause().is_none());
    }

    #[test]
    fn test_not_found_status() {
        let err = HandlerError::not_found("Not found");
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.kind(), "NotFound");
    }

    #[test]
    fn test_with_status_rejects_success_codes() {
        let err = HandlerError::new("Conflict", "taken").with_status(StatusCode::CONFLICT);
        assert_eq!(err.status(), Some(StatusCode::CONFLICT));

        let err = HandlerError::new("Exception", "x").with_status(StatusCode::OK);
        assert_eq!(err.status(), None);

        let err = HandlerError::not_found("gone").with_status(StatusCode::FOUND);
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_from_error_qualified_kind() {
        let parse = "x".parse::<i32>().unwrap_err();
        let err = HandlerError::from_error(parse);
        assert!(err.kind().ends_with("ParseIntError"));
        assert_eq!(err.message(), "invalid digit found in string");
        assert!(err.cause().is_some());
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: HandlerError = json_err.into();
        assert!(err.kind().starts_with("serde_json::"));
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error as _;

        let err = HandlerError::new("Io", "read failed")
            .with_source(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert_eq!(err.source().map(ToString::to_string), Some("disk".to_string()));
    }

    #[test]
    fn test_strategy_error_display() {
        let err = StrategyError::Unknown {
            name: "xml".to_string(),
        };
        assert!(err.to_string().contains("xml"));
    }

    #[test]
    fn test_not_json_safe() {
        let err = HandlerError::not_json_safe("User");
        assert_eq!(err.kind(), NOT_JSON_SAFE_KIND);
        assert!(err.message().contains("User"));
    }
}
