use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::ParserConfig;

/// Errors raised while loading or checking a [`ParserConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Cannot read parser config '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or has fields of the wrong type.
    #[error("Malformed parser config '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The token syntax is inconsistent (e.g. an empty prefix).
    #[error("Invalid parser syntax: {message}")]
    ValidationError { message: String },
}

impl ParserConfig {
    /// Loads a configuration from a TOML file.
    ///
    /// - A missing file is an error; callers wanting defaults use
    ///   `ParserConfig::default()`.
    /// - The parsed configuration is validated before it is returned.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content, path)
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, Path::new("<inline>"))
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: ParserConfig = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded parser config");
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - Both prefixes and the end-of-options marker are non-empty
    /// - The long prefix starts with the short prefix
    /// - The value separator cannot appear in a prefix
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.short_prefix.is_empty() || self.long_prefix.is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Option prefixes must not be empty".to_string(),
            });
        }

        if !self.long_prefix.starts_with(&self.short_prefix) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Long prefix '{}' must start with short prefix '{}'",
                    self.long_prefix, self.short_prefix
                ),
            });
        }

        if self.end_of_options.is_empty() {
            return Err(ConfigError::ValidationError {
                message: "End-of-options marker must not be empty".to_string(),
            });
        }

        if self.long_prefix.contains(self.value_separator) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Value separator '{}' must not appear in prefix '{}'",
                    self.value_separator, self.long_prefix
                ),
            });
        }

        Ok(())
    }
}
