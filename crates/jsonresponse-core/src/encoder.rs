//! Output encoding.
//!
//! Renders a [`Document`] as JSON text, optionally pretty-printed and
//! optionally wrapped in a JSONP callback, and picks the content type.
//!
//! Process-wide [`EncodingOptions`] are built once at startup; per-request
//! overrides are computed into a [`RequestEncoding`] and never written back.

use std::sync::OnceLock;

use bytes::Bytes;
use http::{header, HeaderValue, Response, StatusCode};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::{Document, EncodeError, JsonFormatter, JsonRequest};

/// Callback name used when neither the request nor the configuration names one.
pub const DEFAULT_CALLBACK_NAME: &str = "callback";

/// Content type of plain JSON responses.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Content type of JSONP responses.
pub const JAVASCRIPT_CONTENT_TYPE: &str = "application/javascript; charset=UTF-8";

/// Custom item and key separators for JSON text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Separators {
    /// Written between array elements and object entries.
    pub item: String,
    /// Written between an object key and its value.
    pub key: String,
}

impl Separators {
    /// Creates a separator pair.
    #[must_use]
    pub fn new(item: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            key: key.into(),
        }
    }
}

/// Immutable encoding defaults.
///
/// # Example
///
/// ```
/// use http::{Method, StatusCode, Uri};
/// use jsonresponse_core::{Document, EncodingOptions, JsonRequest};
/// use serde_json::json;
///
/// let options = EncodingOptions::default();
/// let request = JsonRequest::from_uri(Method::GET, Uri::from_static("/users?format=jsonp"));
/// let document = Document::new(json!({"data": [], "err": 0}), StatusCode::OK);
///
/// let rendered = options.encode(&document, &request).unwrap();
/// assert_eq!(rendered.body(), r#"callback({"data": [], "err": 0});"#);
/// assert_eq!(rendered.content_type(), "application/javascript; charset=UTF-8");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingOptions {
    /// Pretty-print every response.
    pub pretty_print: bool,
    /// Honour `format=jsonp`.
    pub jsonp_enabled: bool,
    /// Configured JSONP callback name.
    pub callback_name: String,
    /// Spaces per level when pretty-printing.
    pub indent: usize,
    /// Escape non-ASCII characters in compact output.
    pub ensure_ascii: bool,
    /// Reject request callbacks that are not dotted JS identifiers.
    pub validate_callback: bool,
    /// Custom separators, if any.
    pub separators: Option<Separators>,
}

impl Default for EncodingOptions {
    fn default() -> Self {
        Self {
            pretty_print: false,
            jsonp_enabled: true,
            callback_name: DEFAULT_CALLBACK_NAME.to_string(),
            indent: 4,
            ensure_ascii: false,
            validate_callback: false,
            separators: None,
        }
    }
}

/// Effective encoding for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestEncoding<'a> {
    /// Pretty-print this response.
    pub pretty: bool,
    /// JSONP callback to wrap the body in, if JSONP applies.
    pub callback: Option<&'a str>,
}

impl EncodingOptions {
    /// Resolves the callback name: request, then configured, then built-in default.
    #[must_use]
    pub fn callback_for<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        if let Some(name) = requested {
            if !self.validate_callback || is_valid_callback(name) {
                return name;
            }
            tracing::warn!(callback = name, "ignoring invalid JSONP callback name");
        }

        if self.callback_name.is_empty() {
            DEFAULT_CALLBACK_NAME
        } else {
            &self.callback_name
        }
    }

    /// Computes the per-request overrides.
    #[must_use]
    pub fn for_request<'a>(&'a self, request: &'a JsonRequest) -> RequestEncoding<'a> {
        let jsonp = self.jsonp_enabled && request.wants_jsonp();
        RequestEncoding {
            pretty: self.pretty_print || request.wants_pretty(),
            callback: jsonp.then(|| self.callback_for(request.callback())),
        }
    }

    /// Encodes a document for the given request.
    pub fn encode(&self, document: &Document, request: &JsonRequest) -> Result<Rendered, EncodeError> {
        self.render(document, &self.for_request(request))
    }

    /// Encodes a document with explicit per-request settings.
    pub fn render(
        &self,
        document: &Document,
        encoding: &RequestEncoding<'_>,
    ) -> Result<Rendered, EncodeError> {
        let json = self.to_json(document.body(), encoding.pretty)?;

        let (body, content_type) = match encoding.callback {
            Some(callback) => {
                let mut wrapped = Vec::with_capacity(callback.len() + json.len() + 3);
                wrapped.extend_from_slice(callback.as_bytes());
                wrapped.push(b'(');
                wrapped.extend_from_slice(&json);
                wrapped.extend_from_slice(b");");
                (wrapped, JAVASCRIPT_CONTENT_TYPE)
            }
            None => (json, JSON_CONTENT_TYPE),
        };

        Ok(Rendered {
            body: Bytes::from(body),
            content_type,
            status: document.status(),
        })
    }

    /// Serializes a value to JSON text.
    pub fn to_json(&self, value: &Value, pretty: bool) -> Result<Vec<u8>, EncodeError> {
        let indent = " ".repeat(self.indent);
        let mut formatter = if pretty {
            JsonFormatter::pretty(indent.as_bytes())
        } else {
            JsonFormatter::compact().with_ensure_ascii(self.ensure_ascii)
        };
        if let Some(separators) = &self.separators {
            formatter = formatter.with_separators(&separators.item, &separators.key);
        }

        let mut out = Vec::with_capacity(128);
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        value.serialize(&mut serializer)?;
        Ok(out)
    }
}

/// Returns `true` if `name` is a dotted JavaScript identifier path.
#[must_use]
pub fn is_valid_callback(name: &str) -> bool {
    static CALLBACK: OnceLock<Regex> = OnceLock::new();
    CALLBACK
        .get_or_init(|| {
            Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*(?:\.[A-Za-z_$][A-Za-z0-9_$]*)*$")
                .expect("valid regex")
        })
        .is_match(name)
}

/// An encoded response: body bytes, content type and status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    body: Bytes,
    content_type: &'static str,
    status: StatusCode,
}

impl Rendered {
    /// Returns the body bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the content type.
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Builds the HTTP response.
    #[must_use]
    pub fn into_response(self) -> Response<Bytes> {
        let mut response = Response::new(self.body);
        *response.status_mut() = self.status;
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(self.content_type),
        );
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, Uri};
    use proptest::prelude::*;
    use serde_json::json;

    fn request(uri: &'static str) -> JsonRequest {
        JsonRequest::from_uri(Method::GET, Uri::from_static(uri))
    }

    fn users_document() -> Document {
        Document::new(
            json!({"data": [{"name": "Bob"}, {"name": "Anna"}], "err": 0}),
            StatusCode::OK,
        )
    }

    #[test]
    fn test_compact_json() {
        let rendered = EncodingOptions::default()
            .encode(&Document::new(json!({"hello": "world"}), StatusCode::OK), &request("/"))
            .unwrap();
        assert_eq!(rendered.body(), r#"{"hello": "world"}"#);
        assert_eq!(rendered.content_type(), JSON_CONTENT_TYPE);
        assert_eq!(rendered.status(), StatusCode::OK);
    }

    #[test]
    fn test_debug_pretty_prints() {
        let document = Document::new(json!({"data": {"good": "bye"}, "err": 0}), StatusCode::OK);
        let rendered = EncodingOptions::default()
            .encode(&document, &request("/goodbye?debug=1"))
            .unwrap();
        assert_eq!(
            rendered.body(),
            "{\n    \"data\": {\n        \"good\": \"bye\"\n    },\n    \"err\": 0\n}"
        );
    }

    #[test]
    fn test_process_default_pretty() {
        let options = EncodingOptions {
            pretty_print: true,
            indent: 2,
            ..EncodingOptions::default()
        };
        let rendered = options
            .encode(&Document::new(json!([1]), StatusCode::OK), &request("/"))
            .unwrap();
        assert_eq!(rendered.body(), "[\n  1\n]");
    }

    #[test]
    fn test_jsonp_default_callback() {
        let rendered = EncodingOptions::default()
            .encode(&users_document(), &request("/users?format=jsonp"))
            .unwrap();
        assert_eq!(
            rendered.body(),
            r#"callback({"data": [{"name": "Bob"}, {"name": "Anna"}], "err": 0});"#
        );
        assert_eq!(rendered.content_type(), JAVASCRIPT_CONTENT_TYPE);
    }

    #[test]
    fn test_callback_precedence() {
        let options = EncodingOptions {
            callback_name: "configured".to_string(),
            ..EncodingOptions::default()
        };
        assert_eq!(options.callback_for(Some("my_callback")), "my_callback");
        assert_eq!(options.callback_for(None), "configured");

        let empty = EncodingOptions {
            callback_name: String::new(),
            ..EncodingOptions::default()
        };
        assert_eq!(empty.callback_for(None), DEFAULT_CALLBACK_NAME);
    }

    #[test]
    fn test_request_callback_wraps_body() {
        let rendered = EncodingOptions::default()
            .encode(
                &users_document(),
                &request("/users?format=jsonp&callback=my_callback"),
            )
            .unwrap();
        assert!(rendered.body().starts_with(b"my_callback({"));
        assert!(rendered.body().ends_with(b"});"));
    }

    #[test]
    fn test_jsonp_disabled_falls_back_to_json() {
        let options = EncodingOptions {
            jsonp_enabled: false,
            ..EncodingOptions::default()
        };
        let rendered = options
            .encode(&users_document(), &request("/users?format=jsonp"))
            .unwrap();
        assert_eq!(rendered.content_type(), JSON_CONTENT_TYPE);
        assert!(rendered.body().starts_with(b"{"));
    }

    #[test]
    fn test_callback_validation() {
        assert!(is_valid_callback("callback"));
        assert!(is_valid_callback("jQuery_123.handlers.$done"));
        assert!(!is_valid_callback("alert(1);x"));
        assert!(!is_valid_callback("1abc"));
        assert!(!is_valid_callback("a..b"));

        let options = EncodingOptions {
            validate_callback: true,
            ..EncodingOptions::default()
        };
        assert_eq!(options.callback_for(Some("alert(1);x")), DEFAULT_CALLBACK_NAME);
        assert_eq!(options.callback_for(Some("ok.cb")), "ok.cb");

        let lenient = EncodingOptions::default();
        assert_eq!(lenient.callback_for(Some("alert(1);x")), "alert(1);x");
    }

    #[test]
    fn test_failure_status_is_kept() {
        let document = Document::failed(
            json!({"data": null, "err": 1, "err_class": "Exception", "err_desc": "x"}),
            StatusCode::INTERNAL_SERVER_ERROR,
        );
        let rendered = EncodingOptions::default()
            .encode(&document, &request("/"))
            .unwrap();
        assert_eq!(rendered.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_separators_and_ensure_ascii() {
        let options = EncodingOptions {
            separators: Some(Separators::new(",  ", ":  ")),
            ensure_ascii: true,
            ..EncodingOptions::default()
        };
        let rendered = options
            .encode(&Document::new(json!(["é", {"b": 1}]), StatusCode::OK), &request("/"))
            .unwrap();
        assert_eq!(rendered.body(), r#"["\u00e9",  {"b":  1}]"#);
    }

    #[test]
    fn test_debug_disables_ensure_ascii() {
        let options = EncodingOptions {
            ensure_ascii: true,
            ..EncodingOptions::default()
        };
        let rendered = options
            .encode(&Document::new(json!("é"), StatusCode::OK), &request("/?debug=1"))
            .unwrap();
        assert_eq!(rendered.body(), "\"é\"");
    }

    #[test]
    fn test_into_response() {
        let response = EncodingOptions::default()
            .encode(&users_document(), &request("/users?format=jsonp"))
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            JAVASCRIPT_CONTENT_TYPE
        );
        assert!(response.body().starts_with(b"callback("));
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            any::<String>().prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-z_]{1,8}", inner, 0..4)
                    .prop_map(|map| Value::Object(map.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_encoding_is_idempotent(value in arb_json(), pretty in any::<bool>()) {
            let options = EncodingOptions { pretty_print: pretty, ..EncodingOptions::default() };
            let document = Document::new(value, StatusCode::OK);
            let req = request("/?format=jsonp");
            let first = options.encode(&document, &req).unwrap();
            let second = options.encode(&document, &req).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_jsonp_strips_to_plain_json(value in arb_json(), debug in any::<bool>()) {
            let options = EncodingOptions::default();
            let document = Document::new(value.clone(), StatusCode::OK);
            let (plain_req, jsonp_req) = if debug {
                (request("/?debug=1"), request("/?debug=1&format=jsonp&callback=cb"))
            } else {
                (request("/"), request("/?format=jsonp&callback=cb"))
            };

            let plain = options.encode(&document, &plain_req).unwrap();
            let jsonp = options.encode(&document, &jsonp_req).unwrap();

            let inner = jsonp
                .body()
                .strip_prefix(b"cb(".as_slice())
                .and_then(|rest| rest.strip_suffix(b");".as_slice()))
                .expect("jsonp wrapper");
            prop_assert_eq!(inner, plain.body().as_ref());
            prop_assert_eq!(serde_json::from_slice::<Value>(inner).unwrap(), value);
        }
    }
}
