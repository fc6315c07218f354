//! # jsonresponse Core
//!
//! The response-shaping pipeline that sits between a handler and the wire.
//!
//! A handler returns either a [`Reply`] or a [`HandlerError`]. The pipeline
//! turns that outcome into exactly one JSON (or JSONP) document:
//!
//! ```text
//! handler ─▶ OutcomeNormalizer ─▶ FormatStrategy ─▶ EncodingOptions::encode ─▶ Rendered
//!                                      │
//!                                      └─ resolve() (objects strategy only)
//! ```
//!
//! - [`JsonRequest`] - read-only request facade (method, path, query parameters)
//! - [`Serializable`] - capability for domain objects that render themselves
//! - [`Payload`] / [`Reply`] - what a handler hands back
//! - [`OutcomeNormalizer`] - converts handler errors into [`Failure`]s
//! - [`FormatStrategy`] - `plain`, `api` or `objects` document shaping
//! - [`EncodingOptions`] - JSON/JSONP rendering with pretty-print overrides
//!
//! # Example
//!
//! ```
//! use http::{Method, Uri};
//! use jsonresponse_core::{
//!     EncodingOptions, FormatStrategy, JsonRequest, OutcomeNormalizer, Payload, SerializeContext,
//! };
//! use serde_json::json;
//!
//! let request = JsonRequest::from_uri(Method::GET, Uri::from_static("/goodbye"));
//! let ctx = SerializeContext::new(&request);
//!
//! let normalizer = OutcomeNormalizer::default();
//! let outcome = normalizer
//!     .invoke(|_req| Ok(Payload::from(json!({"good": "bye"}))), &request)
//!     .unwrap();
//!
//! let document = FormatStrategy::Api.shape(outcome, &ctx).unwrap();
//! let rendered = EncodingOptions::default().encode(&document, &request).unwrap();
//!
//! assert_eq!(rendered.body(), r#"{"data": {"good": "bye"}, "err": 0}"#);
//! ```

#![doc(html_root_url = "https://docs.rs/jsonresponse-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod encoder;
mod error;
mod formatter;
mod outcome;
mod payload;
pub mod request;
mod resolver;
mod strategy;

pub use context::SerializeContext;
pub use encoder::{
    is_valid_callback, EncodingOptions, Rendered, RequestEncoding, Separators,
    DEFAULT_CALLBACK_NAME, JAVASCRIPT_CONTENT_TYPE, JSON_CONTENT_TYPE,
};
pub use error::{is_failure_status, EncodeError, HandlerError, HandlerResult, StrategyError};
pub use formatter::JsonFormatter;
pub use outcome::{Failure, HandlerOutcome, OutcomeNormalizer};
pub use payload::{Payload, Reply, Serializable};
pub use request::JsonRequest;
pub use resolver::resolve;
pub use strategy::{Document, FormatStrategy};
