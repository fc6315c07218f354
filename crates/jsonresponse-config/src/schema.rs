//! Configuration schema types.
//!
//! This module defines the structure of all configuration sections.

use http::StatusCode;
use jsonresponse_core::{is_failure_status, EncodingOptions, Separators, DEFAULT_CALLBACK_NAME};
use jsonresponse_telemetry::{LogConfig, LogFormat};
use serde::{Deserialize, Serialize};

/// Largest accepted pretty-print indent.
pub const MAX_INDENT: usize = 16;

/// Encoding configuration section.
///
/// Controls how documents are turned into response bodies. Converted once
/// into the immutable [`EncodingOptions`] at startup.
///
/// # Example
///
/// ```
/// use jsonresponse_config::EncodingConfig;
///
/// let config = EncodingConfig {
///     callback_name: "jsonp_cb".to_string(),
///     pretty_print: true,
///     ..Default::default()
/// };
///
/// let options = config.to_options();
/// assert_eq!(options.callback_name, "jsonp_cb");
/// assert!(options.pretty_print);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EncodingConfig {
    /// JSONP callback used when the request names none.
    #[serde(default = "default_callback_name")]
    pub callback_name: String,

    /// Pretty-print every response, not only `debug=1` requests.
    #[serde(default)]
    pub pretty_print: bool,

    /// Honour `format=jsonp`.
    #[serde(default = "default_true")]
    pub jsonp_enabled: bool,

    /// Spaces per nesting level when pretty-printing.
    #[serde(default = "default_indent")]
    pub indent: usize,

    /// Escape non-ASCII characters as `\uXXXX` in compact output.
    #[serde(default)]
    pub ensure_ascii: bool,

    /// Ignore request callbacks that are not dotted JavaScript identifiers.
    #[serde(default)]
    pub validate_callback: bool,

    /// HTTP status for failure envelopes.
    #[serde(default = "default_error_status")]
    pub error_status: u16,

    /// Separator between items, e.g. `",  "`. Must be set together with `key_separator`.
    #[serde(default)]
    pub item_separator: Option<String>,

    /// Separator between keys and values, e.g. `":  "`.
    #[serde(default)]
    pub key_separator: Option<String>,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            callback_name: default_callback_name(),
            pretty_print: false,
            jsonp_enabled: true,
            indent: default_indent(),
            ensure_ascii: false,
            validate_callback: false,
            error_status: default_error_status(),
            item_separator: None,
            key_separator: None,
        }
    }
}

impl EncodingConfig {
    /// Builds the immutable encoding options.
    #[must_use]
    pub fn to_options(&self) -> EncodingOptions {
        let separators = match (&self.item_separator, &self.key_separator) {
            (Some(item), Some(key)) => Some(Separators::new(item.clone(), key.clone())),
            _ => None,
        };

        EncodingOptions {
            pretty_print: self.pretty_print,
            jsonp_enabled: self.jsonp_enabled,
            callback_name: self.callback_name.clone(),
            indent: self.indent,
            ensure_ascii: self.ensure_ascii,
            validate_callback: self.validate_callback,
            separators,
        }
    }

    /// Returns the failure status, falling back to 500 if out of range.
    #[must_use]
    pub fn error_status(&self) -> StatusCode {
        StatusCode::from_u16(self.error_status)
            .ok()
            .filter(|status| is_failure_status(*status))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

fn default_callback_name() -> String {
    DEFAULT_CALLBACK_NAME.to_string()
}

fn default_indent() -> usize {
    4
}

fn default_error_status() -> u16 {
    500
}

fn default_true() -> bool {
    true
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Install a log subscriber.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive (e.g., "info", "jsonresponse_core=debug").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Emit ANSI colors.
    #[serde(default)]
    pub ansi_enabled: bool,

    /// Log span open/close events.
    #[serde(default)]
    pub span_events: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::Json,
            ansi_enabled: false,
            span_events: false,
        }
    }
}

impl LoggingConfig {
    /// Converts to the telemetry crate's logging configuration.
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            format: self.format,
            ansi: self.ansi_enabled,
            span_events: self.span_events,
            include_target: true,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
