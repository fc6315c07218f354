//! Outcome normalization.
//!
//! The [`OutcomeNormalizer`] calls a handler exactly once and turns whatever
//! it produced into a [`HandlerOutcome`]. Errors are caught here and only
//! here; under the `raise` debug bypass they are handed back to the caller
//! untouched instead.

use http::StatusCode;
use serde_json::{json, Value};

use crate::{is_failure_status, HandlerError, JsonRequest, Payload};

/// A classified handler failure.
///
/// `kind` and `message` become `err_class` and `err_desc` on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    kind: String,
    message: String,
    status: StatusCode,
}

impl Failure {
    /// Creates a failure from its parts.
    #[must_use]
    pub fn new(kind: impl Into<String>, message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            status,
        }
    }

    /// Classifies an error, using `default_status` unless the error carries its own.
    #[must_use]
    pub fn from_error(err: &HandlerError, default_status: StatusCode) -> Self {
        Self::new(
            err.kind(),
            err.message(),
            err.status().unwrap_or(default_status),
        )
    }

    /// Returns the error kind.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the error description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status the failure renders with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Builds the failure envelope.
    #[must_use]
    pub fn to_document(&self) -> Value {
        json!({
            "err_class": self.kind,
            "err_desc": self.message,
            "data": null,
            "err": 1,
        })
    }
}

/// Result of invoking a handler once.
#[derive(Debug)]
pub enum HandlerOutcome<T = Payload> {
    /// The handler returned a value.
    Success(T),
    /// The handler (or a later `serialize` call) failed.
    Failure(Failure),
}

impl<T> HandlerOutcome<T> {
    /// Returns `true` for [`HandlerOutcome::Failure`].
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }
}

/// Invokes handlers and classifies their errors.
///
/// # Example
///
/// ```
/// use http::{Method, StatusCode, Uri};
/// use jsonresponse_core::{HandlerError, HandlerOutcome, JsonRequest, OutcomeNormalizer, Payload};
///
/// let normalizer = OutcomeNormalizer::default();
/// let request = JsonRequest::from_uri(Method::GET, Uri::from_static("/error"));
///
/// let outcome = normalizer
///     .invoke(|_req| Err::<Payload, _>(HandlerError::new("Exception", "Wooot!??")), &request)
///     .unwrap();
///
/// match outcome {
///     HandlerOutcome::Failure(failure) => {
///         assert_eq!(failure.kind(), "Exception");
///         assert_eq!(failure.status(), StatusCode::INTERNAL_SERVER_ERROR);
///     }
///     HandlerOutcome::Success(_) => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct OutcomeNormalizer {
    error_status: StatusCode,
}

impl Default for OutcomeNormalizer {
    fn default() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl OutcomeNormalizer {
    /// Creates a normalizer rendering failures with `error_status` by default.
    ///
    /// A status outside 4xx/5xx falls back to 500.
    #[must_use]
    pub fn new(error_status: StatusCode) -> Self {
        let error_status = if is_failure_status(error_status) {
            error_status
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self { error_status }
    }

    /// Returns the default failure status.
    #[must_use]
    pub fn error_status(&self) -> StatusCode {
        self.error_status
    }

    /// Calls `handler` once and normalizes its result.
    ///
    /// Returns `Err` only when the request asks for the `raise` bypass.
    pub fn invoke<F, T>(
        &self,
        handler: F,
        request: &JsonRequest,
    ) -> Result<HandlerOutcome<T>, HandlerError>
    where
        F: FnOnce(&JsonRequest) -> Result<T, HandlerError>,
    {
        self.normalize(handler(request), request)
    }

    /// Normalizes an already computed handler result.
    pub fn normalize<T>(
        &self,
        result: Result<T, HandlerError>,
        request: &JsonRequest,
    ) -> Result<HandlerOutcome<T>, HandlerError> {
        match result {
            Ok(value) => Ok(HandlerOutcome::Success(value)),
            Err(err) => self.catch(err, request).map(HandlerOutcome::Failure),
        }
    }

    /// Classifies a caught error, or hands it back under the `raise` bypass.
    pub fn catch(&self, err: HandlerError, request: &JsonRequest) -> Result<Failure, HandlerError> {
        tracing::error!(
            http.method = %request.method(),
            http.path = %request.path(),
            err_class = err.kind(),
            err_desc = err.message(),
            cause = ?err.cause(),
            "error occurred while processing request"
        );

        if request.wants_raise() {
            tracing::warn!(
                http.path = %request.path(),
                "raise requested, propagating handler error"
            );
            return Err(err);
        }

        Ok(Failure::from_error(&err, self.error_status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, Uri};
    use std::cell::Cell;

    fn request(uri: &'static str) -> JsonRequest {
        JsonRequest::from_uri(Method::GET, Uri::from_static(uri))
    }

    #[test]
    fn test_success_is_wrapped_raw() {
        let normalizer = OutcomeNormalizer::default();
        let outcome = normalizer
            .invoke(|_| Ok(Payload::from(json!({"a": 1}))), &request("/"))
            .unwrap();

        match outcome {
            HandlerOutcome::Success(Payload::Json(value)) => assert_eq!(value, json!({"a": 1})),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_failure_is_classified() {
        let normalizer = OutcomeNormalizer::default();
        let outcome = normalizer
            .invoke(
                |_| Err::<(), _>(HandlerError::new("Exception", "Wooot!??")),
                &request("/error"),
            )
            .unwrap();

        match outcome {
            HandlerOutcome::Failure(failure) => {
                assert_eq!(failure.kind(), "Exception");
                assert_eq!(failure.message(), "Wooot!??");
                assert_eq!(failure.status(), StatusCode::INTERNAL_SERVER_ERROR);
            }
            HandlerOutcome::Success(()) => panic!("expected failure"),
        }
    }

    #[test]
    fn test_error_status_override() {
        let normalizer = OutcomeNormalizer::new(StatusCode::SERVICE_UNAVAILABLE);
        let failure = normalizer
            .catch(HandlerError::new("Busy", "try later"), &request("/"))
            .unwrap();
        assert_eq!(failure.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_error_own_status_wins() {
        let normalizer = OutcomeNormalizer::new(StatusCode::SERVICE_UNAVAILABLE);
        let failure = normalizer
            .catch(HandlerError::not_found("Not found"), &request("/"))
            .unwrap();
        assert_eq!(failure.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_non_error_status_falls_back_to_500() {
        let normalizer = OutcomeNormalizer::new(StatusCode::OK);
        assert_eq!(normalizer.error_status(), StatusCode::INTERNAL_SERVER_ERROR);

        let failure = OutcomeNormalizer::default()
            .catch(
                HandlerError::new("Moved", "elsewhere").with_status(StatusCode::MOVED_PERMANENTLY),
                &request("/"),
            )
            .unwrap();
        assert_eq!(failure.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_raise_bypass_propagates() {
        let normalizer = OutcomeNormalizer::default();
        let err = normalizer
            .invoke(
                |_| Err::<(), _>(HandlerError::new("Exception", "Wooot!??")),
                &request("/error?debug=1&raise=1"),
            )
            .unwrap_err();
        assert_eq!(err.kind(), "Exception");
        assert_eq!(err.message(), "Wooot!??");
    }

    #[test]
    fn test_raise_does_not_affect_success() {
        let normalizer = OutcomeNormalizer::default();
        let outcome = normalizer
            .invoke(|_| Ok(1), &request("/?raise=1"))
            .unwrap();
        assert!(!outcome.is_failure());
    }

    #[test]
    fn test_handler_invoked_once() {
        let calls = Cell::new(0);
        let normalizer = OutcomeNormalizer::default();
        let _ = normalizer.invoke(
            |_| {
                calls.set(calls.get() + 1);
                Err::<(), _>(HandlerError::new("Exception", "once"))
            },
            &request("/"),
        );
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_failure_document_shape() {
        let failure = Failure::new("Exception", "Wooot!??", StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            failure.to_document(),
            json!({
                "err_class": "Exception",
                "err_desc": "Wooot!??",
                "data": null,
                "err": 1,
            })
        );
    }
}
