//! Handler trait for decorated views.

use jsonresponse_core::{HandlerError, JsonRequest, Reply};

/// A request handler whose result is shaped into JSON.
///
/// Implemented for every `Fn(&JsonRequest) -> Result<R, HandlerError>` where
/// `R` converts into a [`Reply`], so plain functions and closures can be
/// wrapped directly. Implement it by hand for handlers that carry state.
///
/// # Example
///
/// ```
/// use jsonresponse::{HandlerError, JsonHandler, JsonRequest, Payload};
/// use serde_json::json;
///
/// struct Greeter {
///     greeting: &'static str,
/// }
///
/// impl JsonHandler for Greeter {
///     type Output = Payload;
///
///     fn call(&self, _request: &JsonRequest) -> Result<Payload, HandlerError> {
///         Ok(Payload::from(json!({"greeting": self.greeting})))
///     }
/// }
/// ```
pub trait JsonHandler {
    /// The successful result type.
    type Output: Into<Reply>;

    /// Handles one request.
    ///
    /// # Errors
    ///
    /// Any error is rendered as a failure document unless the request asks
    /// for it to be raised.
    fn call(&self, request: &JsonRequest) -> Result<Self::Output, HandlerError>;
}

impl<F, R> JsonHandler for F
where
    F: Fn(&JsonRequest) -> Result<R, HandlerError>,
    R: Into<Reply>,
{
    type Output = R;

    fn call(&self, request: &JsonRequest) -> Result<R, HandlerError> {
        self(request)
    }
}
