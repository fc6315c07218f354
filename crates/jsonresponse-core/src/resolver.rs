//! One-level polymorphic resolution.
//!
//! Only the top-level value, or each element of a top-level sequence, is
//! asked to serialize itself. Values returned by `serialize` are trusted to be
//! JSON-safe and are not resolved again.

use serde_json::Value;

use crate::{HandlerError, Payload, Serializable, SerializeContext};

/// Resolves a payload into a JSON value.
///
/// - an object is replaced by the result of its `serialize` call
/// - a sequence has each object element replaced the same way; other elements
///   pass through unchanged
/// - a JSON value passes through unchanged
///
/// Errors raised by `serialize` are returned as-is.
///
/// # Example
///
/// ```
/// use http::{Method, Uri};
/// use jsonresponse_core::{resolve, HandlerError, JsonRequest, Payload, Serializable, SerializeContext};
/// use serde_json::{json, Value};
///
/// struct Tag(&'static str);
///
/// impl Serializable for Tag {
///     fn serialize(&self, _ctx: &SerializeContext<'_>) -> Result<Value, HandlerError> {
///         Ok(json!({"tag": self.0}))
///     }
/// }
///
/// let request = JsonRequest::from_uri(Method::GET, Uri::from_static("/tags"));
/// let ctx = SerializeContext::new(&request);
///
/// let value = resolve(Payload::objects([Tag("a"), Tag("b")]), &ctx).unwrap();
/// assert_eq!(value, json!([{"tag": "a"}, {"tag": "b"}]));
/// ```
pub fn resolve(payload: Payload, ctx: &SerializeContext<'_>) -> Result<Value, HandlerError> {
    match payload {
        Payload::Json(value) => Ok(value),
        Payload::Object(object) => object.serialize(ctx),
        Payload::Sequence(items) => {
            tracing::trace!(len = items.len(), "resolving top-level sequence");
            items
                .into_iter()
                .map(|item| match item {
                    Payload::Object(object) => object.serialize(ctx),
                    other => other.into_json(),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
    }
}
