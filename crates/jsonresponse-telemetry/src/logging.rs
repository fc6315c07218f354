//! Structured logging.
//!
//! # Example
//!
//! ```rust,ignore
//! use jsonresponse_telemetry::logging::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//!
//! tracing::info!(http.path = "/users", "Rendering response");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::error::TelemetryError;
use crate::TelemetryResult;

/// Output format for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Multi-line, human-readable output.
    Pretty,
    /// Single-line, human-readable output.
    Compact,
}

impl LogFormat {
    /// Returns the format name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
            Self::Compact => "compact",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            other => Err(TelemetryError::InvalidConfig(format!(
                "unknown log format '{other}', expected 'json', 'pretty' or 'compact'"
            ))),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Filter directive (e.g., "info", "jsonresponse_core=debug").
    pub level: String,

    /// Output format.
    pub format: LogFormat,

    /// Whether to emit ANSI colors.
    pub ansi: bool,

    /// Whether to include span open/close events.
    pub span_events: bool,

    /// Whether to include target (module path).
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            format: LogFormat::Json,
            ansi: false,
            span_events: false,
            include_target: true,
        }
    }
}

impl LogConfig {
    /// Creates a development configuration with human-readable output.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            ansi: true,
            span_events: true,
            include_target: true,
        }
    }

    /// Creates a production configuration with JSON output.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }
}

/// Installs the global logging subscriber.
///
/// Does nothing when `config.enabled` is false.
///
/// # Errors
///
/// Returns `TelemetryError::LoggingInit` if the filter is invalid or a global
/// subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.level)?;

    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_span_events(span_events)
        .with_ansi(config.ansi)
        .with_target(config.include_target);

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match config.format {
        LogFormat::Json => fmt_layer.json().boxed(),
        LogFormat::Pretty => fmt_layer.pretty().boxed(),
        LogFormat::Compact => fmt_layer.compact().boxed(),
    };

    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}

/// Creates an env filter from a directive string.
///
/// # Errors
///
/// Returns `TelemetryError::LoggingInit` if the directive is invalid.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter)
        .map_err(|e| TelemetryError::LoggingInit(format!("Invalid log level: {e}")))
}

/// Logs a rendered response.
#[macro_export]
macro_rules! log_response {
    ($strategy:expr, $status:expr, $content_type:expr) => {
        tracing::debug!(
            strategy = %$strategy,
            http.status_code = $status,
            content_type = %$content_type,
            "Response rendered"
        );
    };
}

/// Logs a response passed through without shaping.
#[macro_export]
macro_rules! log_passthrough {
    ($status:expr) => {
        tracing::debug!(
            http.status_code = $status,
            "Handler returned a ready response, passing through"
        );
    };
}
