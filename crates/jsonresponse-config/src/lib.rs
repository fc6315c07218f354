//! Typed configuration for jsonresponse.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! The [`JsonResponseConfig`] holds two sections:
//!
//! - [`EncodingConfig`] - callback name, pretty-printing, JSONP, indent,
//!   separators and the failure status; turned into the immutable
//!   [`EncodingOptions`](jsonresponse_core::EncodingOptions) once at startup
//! - [`LoggingConfig`] - log level and format
//!
//! # Example
//!
//! ```no_run
//! use jsonresponse_config::{ConfigLoader, JsonResponseConfig};
//!
//! # fn main() -> Result<(), jsonresponse_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_defaults()
//!     .with_optional_file("jsonresponse.toml")?
//!     .with_env_prefix("JSONRESPONSE")
//!     .load()?;
//!
//! let options = config.encoding.to_options();
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [encoding]
//! callback_name = "callback"
//! pretty_print = false
//! jsonp_enabled = true
//! indent = 4
//! ensure_ascii = false
//! validate_callback = false
//! error_status = 500
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden with `PREFIX__SECTION__KEY`, for example:
//!
//! - `JSONRESPONSE__ENCODING__CALLBACK_NAME=handle`
//! - `JSONRESPONSE__ENCODING__PRETTY_PRINT=true`
//! - `JSONRESPONSE__LOGGING__FORMAT=compact`

#![doc(html_root_url = "https://docs.rs/jsonresponse-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::*;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
