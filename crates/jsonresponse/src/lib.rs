//! # jsonresponse
//!
//! **JSON and JSONP response shaping for HTTP handlers**
//!
//! Wrap a handler with [`ToJson`] and every value it returns, or error it
//! raises, becomes exactly one JSON document under one of three formats:
//!
//! | Format | Success | Failure (status 500) |
//! |--------|---------|----------------------|
//! | `plain` | the value | `{"err_class": .., "err_desc": .., "data": null, "err": 1}` |
//! | `api` | `{"data": value, "err": 0}` | same |
//! | `objects` | `{"data": value.serialize(ctx), "err": 0}` | same |
//!
//! Query parameters adjust a single response:
//!
//! - `format=jsonp` wraps the body as `callback(...);`
//! - `callback=name` picks the JSONP callback
//! - `debug=1` (or `decode=1`) pretty-prints
//! - `raise=1` hands handler errors back to the caller instead of rendering them
//!
//! ## Quick Start
//!
//! ```
//! use http::{Method, Uri};
//! use jsonresponse::prelude::*;
//! use serde_json::{json, Value};
//!
//! struct User {
//!     name: &'static str,
//!     age: u32,
//! }
//!
//! impl Serializable for User {
//!     fn serialize(&self, ctx: &SerializeContext<'_>) -> Result<Value, HandlerError> {
//!         if ctx.flag("with_age") {
//!             Ok(json!({"name": self.name, "age": self.age}))
//!         } else {
//!             Ok(json!({"name": self.name}))
//!         }
//!     }
//! }
//!
//! let users = ToJson::objects().wrap(|_req| {
//!     Ok(Payload::objects([
//!         User { name: "Bob", age: 10 },
//!         User { name: "Anna", age: 12 },
//!     ]))
//! });
//!
//! let request = JsonRequest::from_uri(Method::GET, Uri::from_static("/users?format=jsonp"));
//! let response = users.call(&request).unwrap();
//!
//! assert_eq!(
//!     response.body(),
//!     r#"callback({"data": [{"name": "Bob"}, {"name": "Anna"}], "err": 0});"#
//! );
//! ```
//!
//! ## Configuration
//!
//! Encoding defaults are loaded once at startup and shared by every view:
//!
//! ```no_run
//! use jsonresponse::{init_logging, ConfigLoader, FormatStrategy, ToJson};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::new()
//!     .with_optional_file("jsonresponse.toml")?
//!     .with_env_prefix("JSONRESPONSE")
//!     .load()?;
//!
//! init_logging(&config)?;
//!
//! let api = ToJson::from_config(FormatStrategy::Api, &config);
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/jsonresponse/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod handler;
mod view;

pub use handler::JsonHandler;
pub use view::{JsonView, ToJson, ViewError};

// Re-export the member crates
pub use jsonresponse_config as config;
pub use jsonresponse_core as core;
pub use jsonresponse_telemetry as telemetry;

pub use jsonresponse_config::{ConfigError, ConfigLoader, JsonResponseConfig};
pub use jsonresponse_core::{
    FormatStrategy, HandlerError, HandlerResult, JsonRequest, Payload, Reply, Serializable,
    SerializeContext, StrategyError,
};
pub use jsonresponse_telemetry::TelemetryError;

/// Installs the log subscriber described by `config.logging`.
///
/// # Errors
///
/// Returns `TelemetryError::LoggingInit` if the level is invalid or a
/// subscriber is already installed.
pub fn init_logging(config: &JsonResponseConfig) -> Result<(), TelemetryError> {
    jsonresponse_telemetry::init_logging(&config.logging.to_log_config())
}

/// Prelude module for convenient imports.
///
/// ```
/// use jsonresponse::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{JsonHandler, JsonView, ToJson, ViewError};

    pub use jsonresponse_core::{
        FormatStrategy, HandlerError, HandlerResult, JsonRequest, Payload, Reply, Serializable,
        SerializeContext,
    };
}
