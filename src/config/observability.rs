use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Observability configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObservabilityConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

// ─────────────────────────────────────────────────────────────────────────────
// Logging
// ─────────────────────────────────────────────────────────────────────────────

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include timestamps.
    #[serde(default = "default_true")]
    pub timestamps: bool,

    /// Include file/line information.
    #[serde(default)]
    pub file_line: bool,

    /// Filter directives (e.g., "archivist=debug,sqlx=warn").
    #[serde(default)]
    pub filter: Option<String>,

    /// Directory for daily-rolling log files. Console output is unaffected.
    /// Requires the `file-logging` feature.
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// File name prefix for rolled log files (`<prefix>.YYYY-MM-DD.log`).
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            timestamps: true,
            file_line: false,
            filter: None,
            directory: None,
            file_prefix: default_file_prefix(),
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.directory.is_some() && self.file_prefix.trim().is_empty() {
            return Err("observability.logging.file_prefix cannot be empty".into());
        }
        Ok(())
    }
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

fn default_file_prefix() -> String {
    "archivist".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable multi-line format.
    Pretty,
    /// Compact single-line format.
    #[default]
    Compact,
    /// JSON format (for log aggregation).
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Compact);
        assert!(config.timestamps);
        assert!(config.directory.is_none());
        assert_eq!(config.file_prefix, "archivist");
    }

    #[test]
    fn test_parse_logging_with_directory() {
        let config: ObservabilityConfig = toml::from_str(
            r#"
            [logging]
            level = "warn"
            format = "pretty"
            directory = "/var/log/archivist"
            file_prefix = "purge"
        "#,
        )
        .unwrap();

        assert_eq!(config.logging.level, LogLevel::Warn);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(
            config.logging.directory,
            Some(PathBuf::from("/var/log/archivist"))
        );
        assert_eq!(config.logging.file_prefix, "purge");
        assert!(config.logging.validate().is_ok());
    }

    #[test]
    fn test_empty_prefix_rejected_with_directory() {
        let config = LoggingConfig {
            directory: Some(PathBuf::from("logs")),
            file_prefix: "  ".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_format_rejected() {
        let result: Result<LoggingConfig, _> = toml::from_str(r#"format = "cef""#);
        assert!(result.is_err());
    }
}
