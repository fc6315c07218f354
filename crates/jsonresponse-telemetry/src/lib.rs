//! Logging setup for jsonresponse.
//!
//! The shaping pipeline reports through [`tracing`]: every caught handler
//! error is logged at `error` level with its `err_class` and `err_desc`, the
//! `raise` bypass is logged at `warn`, and each decorated call runs inside a
//! `to_json` span. This crate installs a subscriber that writes those events
//! as JSON, pretty or compact text.
//!
//! # Example
//!
//! ```rust,ignore
//! use jsonresponse_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::production())?;
//! ```

#![doc(html_root_url = "https://docs.rs/jsonresponse-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig, LogFormat};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
