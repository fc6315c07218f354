//! Format strategies.
//!
//! | Strategy | Success | Failure |
//! |----------|---------|---------|
//! | `plain` | the value itself | error envelope |
//! | `api` | `{"data": value, "err": 0}` | error envelope |
//! | `objects` | `{"data": resolve(value), "err": 0}` | error envelope |
//!
//! The error envelope is `{"err_class": .., "err_desc": .., "data": null, "err": 1}`.

use std::fmt;
use std::str::FromStr;

use http::StatusCode;
use serde_json::{json, Value};

use crate::{resolve, Failure, HandlerError, HandlerOutcome, Payload, SerializeContext, StrategyError};

/// How a handler outcome maps onto the final document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatStrategy {
    /// The value is the document; no envelope, no resolution.
    Plain,
    /// The value is wrapped in the `data`/`err` envelope, unresolved.
    Api,
    /// The value is resolved one level deep, then wrapped in the envelope.
    Objects,
}

impl FormatStrategy {
    /// Returns the strategy name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Api => "api",
            Self::Objects => "objects",
        }
    }

    /// Shapes an outcome into a document.
    ///
    /// Returns `Err` only if building the success document fails (a
    /// `serialize` call failed, or a domain object was found where no
    /// resolution happens). Such errors must be normalized like handler
    /// errors.
    pub fn shape(
        self,
        outcome: HandlerOutcome,
        ctx: &SerializeContext<'_>,
    ) -> Result<Document, HandlerError> {
        match outcome {
            HandlerOutcome::Success(payload) => self.success_document(payload, ctx),
            HandlerOutcome::Failure(failure) => Ok(self.failure_document(&failure)),
        }
    }

    /// Builds the document for a successful handler result.
    pub fn success_document(
        self,
        payload: Payload,
        ctx: &SerializeContext<'_>,
    ) -> Result<Document, HandlerError> {
        let body = match self {
            Self::Plain => payload.into_json()?,
            Self::Api => envelope(payload.into_json()?),
            Self::Objects => envelope(resolve(payload, ctx)?),
        };

        Ok(Document::new(body, StatusCode::OK))
    }

    /// Builds the document for a failure. Every strategy uses the same envelope.
    #[must_use]
    pub fn failure_document(self, failure: &Failure) -> Document {
        Document::failed(failure.to_document(), failure.status())
    }
}

fn envelope(data: Value) -> Value {
    json!({
        "data": data,
        "err": 0,
    })
}

impl fmt::Display for FormatStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatStrategy {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(Self::Plain),
            "api" => Ok(Self::Api),
            "objects" => Ok(Self::Objects),
            other => Err(StrategyError::Unknown {
                name: other.to_string(),
            }),
        }
    }
}

/// The JSON-safe structure produced for one request, ready to encode.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    body: Value,
    status: StatusCode,
    failed: bool,
}

impl Document {
    /// Creates a success document.
    #[must_use]
    pub fn new(body: Value, status: StatusCode) -> Self {
        Self {
            body,
            status,
            failed: false,
        }
    }

    /// Creates a failure document.
    #[must_use]
    pub fn failed(body: Value, status: StatusCode) -> Self {
        Self {
            body,
            status,
            failed: true,
        }
    }

    /// Returns the document body.
    #[must_use]
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Consumes the document, returning its body.
    #[must_use]
    pub fn into_body(self) -> Value {
        self.body
    }

    /// Returns the HTTP status to respond with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns `true` if this is an error envelope.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.failed
    }
}
