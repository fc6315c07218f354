//! The `to_json` decorator.
//!
//! [`ToJson`] binds a [`FormatStrategy`] and encoding options to a handler,
//! producing a [`JsonView`]: a callable taking a request and returning a
//! finished HTTP response.
//!
//! ```text
//! JsonView::call
//!   ├─ handler(request)                  exactly once
//!   ├─ Reply::Response?                  returned untouched
//!   ├─ OutcomeNormalizer::normalize      errors → Failure (or raised)
//!   ├─ FormatStrategy::shape             serialize() errors → Failure (or raised)
//!   └─ EncodingOptions::encode           JSON / JSONP, pretty or compact
//! ```

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use http::{Response, StatusCode};
use jsonresponse_config::JsonResponseConfig;
use jsonresponse_core::{
    EncodeError, EncodingOptions, FormatStrategy, HandlerError, JsonRequest, OutcomeNormalizer,
    Reply, Separators, SerializeContext, StrategyError,
};
use jsonresponse_telemetry::{log_passthrough, log_response};
use thiserror::Error;

use crate::JsonHandler;

/// Errors escaping a decorated view.
#[derive(Debug, Error)]
pub enum ViewError {
    /// The request asked for handler errors to be raised (`raise=1`).
    #[error(transparent)]
    Raised(HandlerError),

    /// The document could not be rendered as JSON text.
    #[error("failed to encode response: {0}")]
    Encode(#[from] EncodeError),
}

impl ViewError {
    /// Returns the raised handler error, if that is what this is.
    #[must_use]
    pub fn raised(&self) -> Option<&HandlerError> {
        match self {
            Self::Raised(err) => Some(err),
            Self::Encode(_) => None,
        }
    }
}

/// Decorator binding a format strategy and encoding options to handlers.
///
/// Options are shared between every view built from the same `ToJson` and
/// never change after setup.
///
/// # Example
///
/// ```
/// use http::{Method, Uri};
/// use jsonresponse::{JsonRequest, ToJson};
/// use serde_json::json;
///
/// let view = ToJson::named("api")
///     .unwrap()
///     .wrap(|_req| Ok(json!({"good": "bye"})));
///
/// let request = JsonRequest::from_uri(Method::GET, Uri::from_static("/goodbye"));
/// let response = view.call(&request).unwrap();
///
/// assert_eq!(response.status(), 200);
/// assert_eq!(response.body(), r#"{"data": {"good": "bye"}, "err": 0}"#);
/// ```
#[derive(Debug, Clone)]
pub struct ToJson {
    strategy: FormatStrategy,
    options: Arc<EncodingOptions>,
    normalizer: OutcomeNormalizer,
}

impl ToJson {
    /// Creates a decorator with default encoding options.
    #[must_use]
    pub fn new(strategy: FormatStrategy) -> Self {
        Self {
            strategy,
            options: Arc::new(EncodingOptions::default()),
            normalizer: OutcomeNormalizer::default(),
        }
    }

    /// Creates a decorator from a strategy name.
    ///
    /// # Errors
    ///
    /// Returns `StrategyError::Unknown` for names other than `plain`, `api`
    /// and `objects`.
    pub fn named(name: &str) -> Result<Self, StrategyError> {
        name.parse().map(Self::new)
    }

    /// Shorthand for `ToJson::new(FormatStrategy::Plain)`.
    #[must_use]
    pub fn plain() -> Self {
        Self::new(FormatStrategy::Plain)
    }

    /// Shorthand for `ToJson::new(FormatStrategy::Api)`.
    #[must_use]
    pub fn api() -> Self {
        Self::new(FormatStrategy::Api)
    }

    /// Shorthand for `ToJson::new(FormatStrategy::Objects)`.
    #[must_use]
    pub fn objects() -> Self {
        Self::new(FormatStrategy::Objects)
    }

    /// Creates a decorator from loaded configuration.
    #[must_use]
    pub fn from_config(strategy: FormatStrategy, config: &JsonResponseConfig) -> Self {
        Self {
            strategy,
            options: Arc::new(config.encoding.to_options()),
            normalizer: OutcomeNormalizer::new(config.encoding.error_status()),
        }
    }

    /// Uses the given encoding options.
    #[must_use]
    pub fn with_options(mut self, options: EncodingOptions) -> Self {
        self.options = Arc::new(options);
        self
    }

    /// Shares an existing set of encoding options.
    #[must_use]
    pub fn with_shared_options(mut self, options: Arc<EncodingOptions>) -> Self {
        self.options = options;
        self
    }

    /// Sets the status used for failure documents.
    ///
    /// Errors carrying their own status (e.g. [`HandlerError::not_found`]) keep it.
    #[must_use]
    pub fn error_status(mut self, status: StatusCode) -> Self {
        self.normalizer = OutcomeNormalizer::new(status);
        self
    }

    /// Uses custom item and key separators, e.g. `",  "` and `":  "`.
    #[must_use]
    pub fn separators(mut self, item: &str, key: &str) -> Self {
        Arc::make_mut(&mut self.options).separators = Some(Separators::new(item, key));
        self
    }

    /// Sets the indent width used when pretty-printing.
    #[must_use]
    pub fn indent(mut self, indent: usize) -> Self {
        Arc::make_mut(&mut self.options).indent = indent;
        self
    }

    /// Escapes non-ASCII characters in compact output.
    #[must_use]
    pub fn ensure_ascii(mut self, ensure_ascii: bool) -> Self {
        Arc::make_mut(&mut self.options).ensure_ascii = ensure_ascii;
        self
    }

    /// Returns the bound strategy.
    #[must_use]
    pub fn strategy(&self) -> FormatStrategy {
        self.strategy
    }

    /// Returns the encoding options.
    #[must_use]
    pub fn options(&self) -> &EncodingOptions {
        &self.options
    }

    /// Wraps a handler function or closure.
    #[must_use]
    pub fn wrap<F, R>(&self, handler: F) -> JsonView<F>
    where
        F: Fn(&JsonRequest) -> Result<R, HandlerError>,
        R: Into<Reply>,
    {
        self.wrap_handler(handler)
    }

    /// Wraps any [`JsonHandler`], including stateful handler types.
    #[must_use]
    pub fn wrap_handler<H: JsonHandler>(&self, handler: H) -> JsonView<H> {
        JsonView {
            handler,
            strategy: self.strategy,
            options: Arc::clone(&self.options),
            normalizer: self.normalizer,
        }
    }
}

/// A handler decorated with JSON response shaping.
///
/// Holds no per-request state; one view can serve any number of requests
/// concurrently if the handler allows it.
pub struct JsonView<H> {
    handler: H,
    strategy: FormatStrategy,
    options: Arc<EncodingOptions>,
    normalizer: OutcomeNormalizer,
}

impl<H: JsonHandler> JsonView<H> {
    /// Handles one request.
    ///
    /// Handler errors and `serialize` errors become failure documents.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Raised` when the request carries a truthy `raise`
    /// parameter and the handler (or a `serialize` call) failed, and
    /// `ViewError::Encode` if the document cannot be rendered.
    pub fn call(&self, request: &JsonRequest) -> Result<Response<Bytes>, ViewError> {
        let span = tracing::debug_span!(
            "to_json",
            strategy = %self.strategy,
            http.method = %request.method(),
            http.path = %request.path(),
        );
        let _enter = span.enter();

        let payload = match self.handler.call(request).map(Into::into) {
            Ok(Reply::Response(response)) => {
                log_passthrough!(response.status().as_u16());
                return Ok(response);
            }
            Ok(Reply::Payload(payload)) => Ok(payload),
            Err(err) => Err(err),
        };

        let outcome = self
            .normalizer
            .normalize(payload, request)
            .map_err(ViewError::Raised)?;

        let ctx = SerializeContext::new(request);
        let document = match self.strategy.shape(outcome, &ctx) {
            Ok(document) => document,
            Err(err) => {
                let failure = self
                    .normalizer
                    .catch(err, request)
                    .map_err(ViewError::Raised)?;
                self.strategy.failure_document(&failure)
            }
        };

        let rendered = self.options.encode(&document, request)?;
        log_response!(self.strategy, rendered.status().as_u16(), rendered.content_type());

        Ok(rendered.into_response())
    }

    /// Handles an [`http::Request`].
    ///
    /// # Errors
    ///
    /// See [`JsonView::call`].
    pub fn handle<B: Into<Bytes>>(
        &self,
        request: http::Request<B>,
    ) -> Result<Response<Bytes>, ViewError> {
        self.call(&JsonRequest::from(request))
    }
}

impl<H> JsonView<H> {
    /// Returns the bound strategy.
    #[must_use]
    pub fn strategy(&self) -> FormatStrategy {
        self.strategy
    }

    /// Returns the wrapped handler.
    #[must_use]
    pub fn handler(&self) -> &H {
        &self.handler
    }
}

impl<H> fmt::Debug for JsonView<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonView")
            .field("handler", &std::any::type_name::<H>())
            .field("strategy", &self.strategy)
            .field("options", &self.options)
            .field("normalizer", &self.normalizer)
            .finish()
    }
}
