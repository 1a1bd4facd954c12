//! Tracing initialization with configurable console formats and optional
//! daily-rolling log files.

#[cfg(feature = "file-logging")]
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingConfig, ObservabilityConfig};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize the tracing subscriber with the given configuration.
///
/// This sets up:
/// - Console logging on stderr with configurable format (pretty, compact, JSON)
/// - Environment-based log filtering
/// - Daily-rolling file output (if a directory is configured)
///
/// The returned guard must be held until exit or buffered file output is lost.
pub fn init_tracing(config: &ObservabilityConfig) -> Result<TracingGuard, TracingError> {
    let logging = &config.logging;
    let filter = build_env_filter(logging);

    #[cfg_attr(not(feature = "file-logging"), allow(unused_mut))]
    let mut layers: Vec<BoxedLayer> = vec![fmt_layer(logging, std::io::stderr, true)];

    #[cfg(feature = "file-logging")]
    let file_guard = match &logging.directory {
        Some(dir) => {
            let (layer, guard) = file_layer(logging, dir)?;
            layers.push(layer);
            Some(guard)
        }
        None => None,
    };
    #[cfg(not(feature = "file-logging"))]
    let file_guard: Option<()> = None;

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| TracingError::Init(e.to_string()))?;

    #[cfg(not(feature = "file-logging"))]
    if let Some(dir) = &logging.directory {
        tracing::warn!(
            directory = %dir.display(),
            "File logging is configured but the 'file-logging' feature is not compiled. \
            Rebuild with: cargo build --features file-logging"
        );
    }

    Ok(TracingGuard {
        _file_guard: file_guard,
    })
}

/// Build one formatting layer for the configured format.
fn fmt_layer<W>(logging: &LoggingConfig, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let base = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true)
        .with_file(logging.file_line)
        .with_line_number(logging.file_line);

    match (&logging.format, logging.timestamps) {
        (LogFormat::Pretty, true) => base.pretty().boxed(),
        (LogFormat::Pretty, false) => base.pretty().without_time().boxed(),
        (LogFormat::Compact, true) => base.compact().boxed(),
        (LogFormat::Compact, false) => base.compact().without_time().boxed(),
        (LogFormat::Json, true) => base.json().boxed(),
        (LogFormat::Json, false) => base.json().without_time().boxed(),
    }
}

/// Build the file layer writing `<prefix>.YYYY-MM-DD.log` under `dir`.
#[cfg(feature = "file-logging")]
fn file_layer(
    logging: &LoggingConfig,
    dir: &std::path::Path,
) -> Result<(BoxedLayer, WorkerGuard), TracingError> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(logging.file_prefix.as_str())
        .filename_suffix("log")
        .build(dir)
        .map_err(|e| {
            TracingError::Init(format!(
                "Failed to open log directory {}: {}",
                dir.display(),
                e
            ))
        })?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    Ok((fmt_layer(logging, writer, false), guard))
}

/// Build the environment filter from logging config.
fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    let base_level = config.level.as_str();

    // Check for RUST_LOG environment variable first
    if let Ok(env_filter) = std::env::var("RUST_LOG") {
        EnvFilter::try_new(env_filter).unwrap_or_else(|_| EnvFilter::new(base_level))
    } else if let Some(filter) = &config.filter {
        // Use config filter if provided
        let combined = format!("{},{}", base_level, filter);
        EnvFilter::try_new(combined).unwrap_or_else(|_| EnvFilter::new(base_level))
    } else {
        // Per-statement sqlx logging is noise during a purge
        EnvFilter::new(format!("{},sqlx=warn", base_level))
    }
}

/// Guard that flushes buffered log files on drop.
pub struct TracingGuard {
    #[cfg(feature = "file-logging")]
    _file_guard: Option<WorkerGuard>,
    #[cfg(not(feature = "file-logging"))]
    _file_guard: Option<()>,
}

/// Tracing initialization errors.
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Failed to initialize tracing: {0}")]
    Init(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;

    #[test]
    fn test_default_filter_quiets_sqlx() {
        temp_env::with_var_unset("RUST_LOG", || {
            let filter = build_env_filter(&LoggingConfig::default()).to_string();
            assert!(filter.contains("sqlx=warn"), "got {filter}");
            assert!(filter.contains("info"), "got {filter}");
        });
    }

    #[test]
    fn test_config_filter_is_appended() {
        temp_env::with_var_unset("RUST_LOG", || {
            let config = LoggingConfig {
                level: LogLevel::Warn,
                filter: Some("archivist=debug".into()),
                ..Default::default()
            };
            let filter = build_env_filter(&config).to_string();
            assert!(filter.contains("archivist=debug"), "got {filter}");
            assert!(filter.contains("warn"), "got {filter}");
        });
    }

    #[test]
    fn test_rust_log_wins() {
        temp_env::with_var("RUST_LOG", Some("archivist=trace"), || {
            let config = LoggingConfig {
                filter: Some("archivist=error".into()),
                ..Default::default()
            };
            let filter = build_env_filter(&config).to_string();
            assert!(filter.contains("archivist=trace"), "got {filter}");
            assert!(!filter.contains("archivist=error"), "got {filter}");
        });
    }

    #[test]
    #[cfg(feature = "file-logging")]
    fn test_file_layer_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        let config = LoggingConfig {
            directory: Some(logs.clone()),
            ..Default::default()
        };

        let (_layer, _guard) = file_layer(&config, &logs).unwrap();
        assert!(logs.is_dir());
    }
}
