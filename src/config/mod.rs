//! Configuration module for the archive retention tool.
//!
//! The tool is configured via a TOML file, with support for environment
//! variable interpolation using `${VAR_NAME}` syntax.
//!
//! # Example
//!
//! ```toml
//! [database]
//! type = "sqlite"
//! path = "${ARCHIVE_DIR}/archive.db"
//!
//! [observability.logging]
//! level = "info"
//! directory = "/var/log/archivist"
//!
//! [retention]
//! default_days = 180
//! batch_size = 5000
//! sample_size = 1000
//! ```

mod database;
mod observability;
mod retention;

use std::path::Path;

pub use database::*;
pub use observability::*;
pub use retention::*;
use serde::{Deserialize, Serialize};

/// Root configuration.
///
/// All sections are optional with sensible defaults. Without a `[database]`
/// section nothing can be purged, so the CLI refuses to run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArchivistConfig {
    /// Database holding the archive.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Purge defaults and batch sizing.
    #[serde(default)]
    pub retention: RetentionConfig,
}

impl ArchivistConfig {
    /// Load configuration from a TOML file.
    ///
    /// Environment variables in the format `${VAR_NAME}` are expanded.
    /// Missing required variables will cause an error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(e, path.as_ref().to_path_buf()))?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(contents: &str) -> Result<Self, ConfigError> {
        let expanded = expand_env_vars(contents)?;
        let config: ArchivistConfig = toml::from_str(&expanded).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration for consistency and completeness.
    fn validate(&self) -> Result<(), ConfigError> {
        self.database.validate()?;
        self.observability
            .logging
            .validate()
            .map_err(ConfigError::Validation)?;
        self.retention.validate().map_err(ConfigError::Validation)?;
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {1}: {0}")]
    Io(std::io::Error, std::path::PathBuf),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

/// Expand environment variables in the format `${VAR_NAME}`.
///
/// Anything after a `#` on a line is a comment and left untouched, so
/// commented-out settings may reference variables that are not set.
fn expand_env_vars(input: &str) -> Result<String, ConfigError> {
    let pattern = regex::Regex::new(r"\$\{([^}]+)\}")
        .map_err(|e| ConfigError::Validation(format!("Invalid interpolation pattern: {e}")))?;

    let mut expanded = Vec::new();
    for line in input.split('\n') {
        let (code, comment) = match line.find('#') {
            Some(pos) => line.split_at(pos),
            None => (line, ""),
        };

        let mut out = String::with_capacity(line.len());
        let mut last_end = 0;
        for caps in pattern.captures_iter(code) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let value = std::env::var(name.as_str())
                .map_err(|_| ConfigError::EnvVarNotFound(name.as_str().to_string()))?;
            out.push_str(&code[last_end..whole.start()]);
            out.push_str(&value);
            last_end = whole.end();
        }
        out.push_str(&code[last_end..]);
        out.push_str(comment);
        expanded.push(out);
    }

    Ok(expanded.join("\n"))
}
