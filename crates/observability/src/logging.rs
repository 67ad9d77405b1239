//! Tracing/logging initialization.
//!
//! Console output is JSON or pretty, filtered by `RUST_LOG` (default `info`).
//! When a log directory is configured, the same events are also written as
//! JSON lines to a daily-rolling file through a non-blocking writer.

use std::path::PathBuf;
use std::str::FromStr;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const FILE_PREFIX: &str = "advisorhub";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(format!("unknown log format `{other}` (expected `json` or `pretty`)")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ObservabilityConfig {
    pub format: LogFormat,
    /// Also write logs to daily-rolling files in this directory.
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ObservabilityError {
    #[error("failed to open log file: {0}")]
    LogFile(#[from] InitError),
}

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops and return `None`).
/// The returned guard flushes the file writer on drop; hold it for the
/// lifetime of the process.
pub fn init(config: &ObservabilityConfig) -> Result<Option<WorkerGuard>, ObservabilityError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console = match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_timer(fmt::time::SystemTime)
            .with_target(false)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().with_target(false).boxed(),
    };

    let (file, guard) = match config.log_dir.as_deref() {
        Some(dir) => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(FILE_PREFIX)
                .filename_suffix("log")
                .build(dir)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_ansi(false)
                .with_target(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(format = ?config.format, log_dir = ?config.log_dir, "logging initialized");
        Ok(guard)
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_log_formats_case_insensitively() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" Pretty ".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn init_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let config = ObservabilityConfig {
            format: LogFormat::Json,
            log_dir: Some(dir.path().to_path_buf()),
        };

        let _first = init(&config).unwrap();
        let second = init(&config).unwrap();
        assert!(second.is_none());
    }
}
