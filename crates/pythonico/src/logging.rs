//! Log file setup.
//!
//! The terminal belongs to the UI, so logs go to a daily rolling file under
//! `<local data dir>/pythonico/logs` (or the system temp dir). `RUST_LOG` overrides the
//! default `info` filter.

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_PREFIX: &str = "pythonico.log";

/// Directory that receives the log files.
pub fn logs_dir() -> PathBuf {
    let preferred = dirs::data_local_dir().map(|dir| dir.join("pythonico").join("logs"));
    match preferred {
        Some(dir) if std::fs::create_dir_all(&dir).is_ok() => dir,
        _ => std::env::temp_dir().join("pythonico-logs"),
    }
}

/// Install the global subscriber. Keep the returned guard alive until exit so buffered lines
/// are flushed.
pub fn init() -> anyhow::Result<WorkerGuard> {
    let dir = logs_dir();
    std::fs::create_dir_all(&dir)?;

    let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()?;

    tracing::info!(dir = %dir.display(), "logging initialized");
    Ok(guard)
}
