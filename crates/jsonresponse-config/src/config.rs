//! Main configuration types.
//!
//! This module provides the top-level [`JsonResponseConfig`] struct and its builder.

use jsonresponse_core::is_valid_callback;
use jsonresponse_telemetry::LogFormat;
use serde::{Deserialize, Serialize};

use crate::{ConfigError, EncodingConfig, LoggingConfig, MAX_INDENT};

/// Complete jsonresponse configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load configuration from files
/// and environment variables.
///
/// # Example
///
/// ```
/// use jsonresponse_config::JsonResponseConfig;
///
/// let config = JsonResponseConfig::default();
/// assert_eq!(config.encoding.callback_name, "callback");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct JsonResponseConfig {
    /// Output encoding configuration.
    #[serde(default)]
    pub encoding: EncodingConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl JsonResponseConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use jsonresponse_config::{EncodingConfig, JsonResponseConfig};
    ///
    /// let config = JsonResponseConfig::builder()
    ///     .encoding(EncodingConfig {
    ///         callback_name: "cb".to_string(),
    ///         ..Default::default()
    ///     })
    ///     .build();
    ///
    /// assert_eq!(config.encoding.callback_name, "cb");
    /// ```
    #[must_use]
    pub fn builder() -> JsonResponseConfigBuilder {
        JsonResponseConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - `encoding.callback_name` is empty, or not a dotted identifier while
    ///   `encoding.validate_callback` is set
    /// - `encoding.indent` exceeds 16
    /// - `encoding.error_status` is not a 4xx or 5xx code
    /// - only one of the two separators is set
    /// - `logging.level` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        let encoding = &self.encoding;

        if encoding.callback_name.is_empty() {
            return Err(ConfigError::invalid_value(
                "encoding.callback_name",
                "must not be empty",
            ));
        }

        if encoding.validate_callback && !is_valid_callback(&encoding.callback_name) {
            return Err(ConfigError::invalid_value(
                "encoding.callback_name",
                format!(
                    "'{}' is not a valid JavaScript identifier path",
                    encoding.callback_name
                ),
            ));
        }

        if encoding.indent > MAX_INDENT {
            return Err(ConfigError::invalid_value(
                "encoding.indent",
                format!("must be at most {MAX_INDENT}"),
            ));
        }

        if !(400..=599).contains(&encoding.error_status) {
            return Err(ConfigError::invalid_value(
                "encoding.error_status",
                format!("{} is not a 4xx or 5xx status", encoding.error_status),
            ));
        }

        if encoding.item_separator.is_some() != encoding.key_separator.is_some() {
            return Err(ConfigError::validation_error(
                "encoding.item_separator and encoding.key_separator must be set together",
            ));
        }

        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid_value("logging.level", "must not be empty"));
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// - Pretty-printed responses
    /// - Pretty log formatting with ANSI colors
    /// - Debug log level
    ///
    /// # Example
    ///
    /// ```
    /// use jsonresponse_config::JsonResponseConfig;
    ///
    /// let config = JsonResponseConfig::development();
    /// assert!(config.encoding.pretty_print);
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.encoding.pretty_print = true;

        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.ansi_enabled = true;
        config.logging.span_events = true;

        config
    }

    /// Create a production configuration preset.
    ///
    /// - Compact responses
    /// - Callback names checked against the identifier grammar
    /// - JSON log formatting at info level
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.encoding.validate_callback = true;

        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config.logging.ansi_enabled = false;

        config
    }
}

/// Builder for [`JsonResponseConfig`].
#[derive(Debug, Default)]
pub struct JsonResponseConfigBuilder {
    encoding: Option<EncodingConfig>,
    logging: Option<LoggingConfig>,
}

impl JsonResponseConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the encoding configuration.
    #[must_use]
    pub fn encoding(mut self, encoding: EncodingConfig) -> Self {
        self.encoding = Some(encoding);
        self
    }

    /// Set the logging configuration.
    #[must_use]
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Build the configuration.
    ///
    /// Any unset sections will use their default values.
    #[must_use]
    pub fn build(self) -> JsonResponseConfig {
        JsonResponseConfig {
            encoding: self.encoding.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<JsonResponseConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = JsonResponseConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.encoding.error_status, 500);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(JsonResponseConfig::development().validate().is_ok());
        assert!(JsonResponseConfig::production().validate().is_ok());
    }

    #[test]
    fn test_production_preset() {
        let config = JsonResponseConfig::production();
        assert!(!config.encoding.pretty_print);
        assert!(config.encoding.validate_callback);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_builder_partial() {
        let config = JsonResponseConfig::builder()
            .logging(LoggingConfig {
                level: "warn".to_string(),
                ..Default::default()
            })
            .build();

        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.encoding, EncodingConfig::default());
    }

    #[test]
    fn test_validate_empty_callback() {
        let result = JsonResponseConfig::builder()
            .encoding(EncodingConfig {
                callback_name: String::new(),
                ..Default::default()
            })
            .build_validated();

        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_validate_callback_identifier() {
        let encoding = EncodingConfig {
            callback_name: "alert(1)".to_string(),
            ..Default::default()
        };

        // Accepted verbatim unless validation is requested.
        let config = JsonResponseConfig::builder().encoding(encoding.clone()).build();
        assert!(config.validate().is_ok());

        let config = JsonResponseConfig::builder()
            .encoding(EncodingConfig {
                validate_callback: true,
                ..encoding
            })
            .build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_indent() {
        let config = JsonResponseConfig::builder()
            .encoding(EncodingConfig {
                indent: 17,
                ..Default::default()
            })
            .build();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("encoding.indent"));
    }

    #[test]
    fn test_validate_error_status() {
        for status in [200, 302, 600] {
            let config = JsonResponseConfig::builder()
                .encoding(EncodingConfig {
                    error_status: status,
                    ..Default::default()
                })
                .build();
            assert!(config.validate().is_err(), "status {status} accepted");
        }
    }

    #[test]
    fn test_validate_lone_separator() {
        let config = JsonResponseConfig::builder()
            .encoding(EncodingConfig {
                key_separator: Some(": ".to_string()),
                ..Default::default()
            })
            .build();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_empty_log_level() {
        let config = JsonResponseConfig::builder()
            .logging(LoggingConfig {
                level: "  ".to_string(),
                ..Default::default()
            })
            .build();
        assert!(config.validate().is_err());
    }
}
