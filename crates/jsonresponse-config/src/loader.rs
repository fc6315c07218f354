//! Configuration loader with layered approach.
//!
//! This module provides the [`ConfigLoader`] for loading configuration from
//! multiple sources: defaults, files, and environment variables.

use std::env;
use std::fs;
use std::path::Path;

use crate::{ConfigError, JsonResponseConfig};

/// Configuration loader with layered approach.
///
/// The loader applies configuration in layers, with later layers overriding
/// earlier ones:
/// 1. Default values (built into the code)
/// 2. Configuration file (TOML or JSON)
/// 3. Environment variables
///
/// # Example
///
/// ```no_run
/// use jsonresponse_config::ConfigLoader;
///
/// # fn main() -> Result<(), jsonresponse_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_defaults()
///     .with_file("jsonresponse.toml")?
///     .with_env_prefix("JSONRESPONSE")
///     .load()?;
///
/// let options = config.encoding.to_options();
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: JsonResponseConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader starting from defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: JsonResponseConfig::default(),
            env_prefix: None,
        }
    }

    /// Start with default configuration values.
    ///
    /// This is what `new()` starts from, but can be chained for clarity.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = JsonResponseConfig::default();
        self
    }

    /// Start with the development preset.
    ///
    /// # Example
    ///
    /// ```
    /// use jsonresponse_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_development()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert!(config.encoding.pretty_print);
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = JsonResponseConfig::development();
        self
    }

    /// Start with the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = JsonResponseConfig::production();
        self
    }

    /// Load configuration from a file.
    ///
    /// The format is chosen by extension: `.toml` or `.json`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The file does not exist
    /// - The file cannot be read
    /// - The extension is neither `toml` nor `json`
    /// - The file contains invalid TOML/JSON or unknown fields
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;

        self.config = Self::parse(&content, &format)?;
        Ok(self)
    }

    /// Load configuration from a file if it exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be loaded.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the format is unknown or parsing fails.
    ///
    /// # Example
    ///
    /// ```
    /// use jsonresponse_config::ConfigLoader;
    ///
    /// let toml = r#"
    ///     [encoding]
    ///     callback_name = "handle"
    ///     indent = 2
    /// "#;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.encoding.callback_name, "handle");
    /// assert_eq!(config.encoding.indent, 2);
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = Self::parse(content, &format.to_lowercase())?;
        Ok(self)
    }

    /// Set environment variable prefix for overrides.
    ///
    /// Environment variables use the format `PREFIX__SECTION__KEY`, e.g.
    /// `JSONRESPONSE__ENCODING__CALLBACK_NAME=cb`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load a `.env` file from the current directory, if there is one.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Dotenv` if the file exists but cannot be parsed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(e.into()),
        }
    }

    /// Finalize and return the loaded configuration.
    ///
    /// Applies environment variable overrides (if a prefix was set) and
    /// validates the final configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an override cannot be parsed or validation fails.
    pub fn load(mut self) -> Result<JsonResponseConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }

        self.config.validate()?;

        Ok(self.config)
    }

    /// Finalize without env overrides or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> JsonResponseConfig {
        self.config
    }

    fn parse(content: &str, format: &str) -> Result<JsonResponseConfig, ConfigError> {
        match format {
            "toml" => Ok(toml::from_str(content)?),
            "json" => Ok(serde_json::from_str(content)?),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        let scope = format!("{prefix}__");
        let mut vars: Vec<(String, String)> = env::vars()
            .filter(|(k, _)| k.starts_with(&scope))
            .collect();
        vars.sort();

        for (key, value) in vars {
            self.apply_env_var(&key, &value, prefix)?;
        }

        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let key_without_prefix = key
            .strip_prefix(prefix)
            .and_then(|k| k.strip_prefix("__"))
            .ok_or_else(|| ConfigError::env_parse_error(key, "invalid key format"))?;

        let parts: Vec<&str> = key_without_prefix.split("__").collect();
        let encoding = &mut self.config.encoding;
        let logging = &mut self.config.logging;

        match parts.as_slice() {
            ["ENCODING", "CALLBACK_NAME"] => encoding.callback_name = value.to_string(),
            ["ENCODING", "PRETTY_PRINT"] => encoding.pretty_print = bool_var(key, value)?,
            ["ENCODING", "JSONP_ENABLED"] => encoding.jsonp_enabled = bool_var(key, value)?,
            ["ENCODING", "INDENT"] => {
                encoding.indent = value
                    .parse()
                    .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))?;
            }
            ["ENCODING", "ENSURE_ASCII"] => encoding.ensure_ascii = bool_var(key, value)?,
            ["ENCODING", "VALIDATE_CALLBACK"] => {
                encoding.validate_callback = bool_var(key, value)?;
            }
            ["ENCODING", "ERROR_STATUS"] => {
                encoding.error_status = value
                    .parse()
                    .map_err(|_| ConfigError::env_parse_error(key, "expected status code"))?;
            }
            ["ENCODING", "ITEM_SEPARATOR"] => encoding.item_separator = optional(value),
            ["ENCODING", "KEY_SEPARATOR"] => encoding.key_separator = optional(value),
            ["LOGGING", "ENABLED"] => logging.enabled = bool_var(key, value)?,
            ["LOGGING", "LEVEL"] => logging.level = value.to_string(),
            ["LOGGING", "FORMAT"] => {
                logging.format = value.parse().map_err(|_| {
                    ConfigError::env_parse_error(key, "expected 'json', 'pretty' or 'compact'")
                })?;
            }
            ["LOGGING", "ANSI_ENABLED"] => logging.ansi_enabled = bool_var(key, value)?,
            ["LOGGING", "SPAN_EVENTS"] => logging.span_events = bool_var(key, value)?,
            // Unknown key - ignore
            _ => {}
        }

        Ok(())
    }
}

fn bool_var(key: &str, value: &str) -> Result<bool, ConfigError> {
    parse_bool(value).ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parse a boolean from a string.
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
