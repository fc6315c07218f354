//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Failed to read configuration file.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration format other than TOML or JSON.
    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// TOML parsing error.
    #[error("failed to parse TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// JSON parsing error.
    #[error("failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// `.env` file could not be loaded.
    #[error("failed to load .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),

    /// Invalid configuration value.
    #[error("invalid configuration value for {field}: {reason}")]
    InvalidValue {
        /// Dotted path of the offending field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Environment variable parsing error.
    #[error("failed to parse environment variable {var}: {reason}")]
    EnvParseError {
        /// The environment variable name.
        var: String,
        /// Explanation of the parsing error.
        reason: String,
    },

    /// Cross-field validation failure.
    #[error("configuration validation failed: {0}")]
    ValidationError(String),
}

impl ConfigError {
    /// Create a new file not found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a new read error.
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Create a new invalid value error.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a new environment variable parse error.
    pub fn env_parse_error(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EnvParseError {
            var: var.into(),
            reason: reason.into(),
        }
    }

    /// Create a new validation error.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_error() {
        let err = ConfigError::file_not_found("/etc/jsonresponse/config.toml");
        assert!(err.to_string().contains("/etc/jsonresponse/config.toml"));
    }

    #[test]
    fn test_invalid_value_error() {
        let err = ConfigError::invalid_value("encoding.indent", "must be at most 16");
        assert_eq!(
            err.to_string(),
            "invalid configuration value for encoding.indent: must be at most 16"
        );
    }

    #[test]
    fn test_env_parse_error() {
        let err = ConfigError::env_parse_error("JSONRESPONSE__ENCODING__INDENT", "expected integer");
        assert!(err.to_string().contains("JSONRESPONSE__ENCODING__INDENT"));
        assert!(err.to_string().contains("expected integer"));
    }

    #[test]
    fn test_unsupported_format_error() {
        let err = ConfigError::UnsupportedFormat("yaml".to_string());
        assert_eq!(err.to_string(), "unsupported configuration format: yaml");
    }

    #[test]
    fn test_toml_error_converts() {
        let err: ConfigError = toml::from_str::<toml::Value>("= nope").unwrap_err().into();
        assert!(matches!(err, ConfigError::TomlError(_)));
    }
}
