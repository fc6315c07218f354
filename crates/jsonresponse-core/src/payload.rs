//! Handler return values.
//!
//! A handler hands back a [`Reply`]: either a [`Payload`] to be shaped and
//! encoded, or a ready [`http::Response`] that bypasses the pipeline.

use std::fmt;

use bytes::Bytes;
use http::Response;
use serde::Serialize;
use serde_json::Value;

use crate::{HandlerError, SerializeContext};

/// Capability of a domain object that knows how to render itself as JSON.
///
/// The returned value is used as-is; it is never resolved again.
///
/// # Example
///
/// ```
/// use jsonresponse_core::{HandlerError, Serializable, SerializeContext};
/// use serde_json::{json, Value};
///
/// struct User {
///     name: String,
///     age: u32,
/// }
///
/// impl Serializable for User {
///     fn serialize(&self, ctx: &SerializeContext<'_>) -> Result<Value, HandlerError> {
///         if ctx.flag("with_age") {
///             Ok(json!({"name": self.name, "age": self.age}))
///         } else {
///             Ok(json!({"name": self.name}))
///         }
///     }
/// }
/// ```
pub trait Serializable {
    /// Renders this object for the current request.
    fn serialize(&self, ctx: &SerializeContext<'_>) -> Result<Value, HandlerError>;

    /// Type name used in diagnostics.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A value produced by a handler, classified for serialization.
pub enum Payload {
    /// An already JSON-safe scalar, mapping or array.
    Json(Value),
    /// A domain object exposing the [`Serializable`] capability.
    Object(Box<dyn Serializable>),
    /// A top-level sequence whose elements may be objects.
    Sequence(Vec<Payload>),
}

impl Payload {
    /// Converts any `serde` value into a JSON payload.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, HandlerError> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    /// The JSON `null` payload.
    #[must_use]
    pub fn null() -> Self {
        Self::Json(Value::Null)
    }

    /// Wraps a single domain object.
    #[must_use]
    pub fn object<S: Serializable + 'static>(object: S) -> Self {
        Self::Object(Box::new(object))
    }

    /// Wraps a list of domain objects.
    #[must_use]
    pub fn objects<I, S>(objects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Serializable + 'static,
    {
        Self::Sequence(objects.into_iter().map(Self::object).collect())
    }

    /// Builds a sequence of mixed payloads.
    #[must_use]
    pub fn sequence<I, P>(items: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Payload>,
    {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }

    /// Returns `true` if this payload is a domain object.
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Converts the payload to JSON without calling any `serialize` capability.
    ///
    /// Fails if a domain object is found anywhere in the payload.
    pub fn into_json(self) -> Result<Value, HandlerError> {
        match self {
            Self::Json(value) => Ok(value),
            Self::Object(object) => Err(HandlerError::not_json_safe(object.type_name())),
            Self::Sequence(items) => items
                .into_iter()
                .map(Self::into_json)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(value) => f.debug_tuple("Json").field(value).finish(),
            Self::Object(object) => f.debug_tuple("Object").field(&object.type_name()).finish(),
            Self::Sequence(items) => f.debug_tuple("Sequence").field(items).finish(),
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

/// What a handler returns on success.
#[derive(Debug)]
pub enum Reply {
    /// A value to shape and encode.
    Payload(Payload),
    /// A finished response, returned untouched.
    Response(Response<Bytes>),
}

impl From<Payload> for Reply {
    fn from(payload: Payload) -> Self {
        Self::Payload(payload)
    }
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        Self::Payload(Payload::Json(value))
    }
}

impl From<Response<Bytes>> for Reply {
    fn from(response: Response<Bytes>) -> Self {
        Self::Response(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Marker;

    impl Serializable for Marker {
        fn serialize(&self, _ctx: &SerializeContext<'_>) -> Result<Value, HandlerError> {
            Ok(json!("marker"))
        }
    }

    #[derive(Serialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn test_json_from_serde() {
        let payload = Payload::json(&Point { x: 1, y: 2 }).unwrap();
        assert_eq!(payload.into_json().unwrap(), json!({"x": 1, "y": 2}));
    }

    #[test]
    fn test_into_json_plain_sequence() {
        let payload = Payload::sequence(vec![json!("a"), json!({"b": 1})]);
        assert_eq!(payload.into_json().unwrap(), json!(["a", {"b": 1}]));
    }

    #[test]
    fn test_into_json_rejects_object() {
        let err = Payload::object(Marker).into_json().unwrap_err();
        assert_eq!(err.kind(), "jsonresponse::NotJsonSafe");
        assert!(err.message().contains("Marker"));
    }

    #[test]
    fn test_into_json_rejects_object_in_sequence() {
        let payload = Payload::Sequence(vec![Payload::null(), Payload::object(Marker)]);
        assert!(payload.into_json().is_err());
    }

    #[test]
    fn test_objects_builder() {
        let payload = Payload::objects(vec![Marker, Marker]);
        match payload {
            Payload::Sequence(items) => {
                assert_eq!(items.len(), 2);
                assert!(items.iter().all(Payload::is_object));
            }
            other => panic!("expected sequence, got {other:?}"),
        }
    }

    #[test]
    fn test_reply_conversions() {
        assert!(matches!(Reply::from(json!(1)), Reply::Payload(Payload::Json(_))));
        assert!(matches!(
            Reply::from(Response::new(Bytes::new())),
            Reply::Response(_)
        ));
    }
}
