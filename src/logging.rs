//! File logging. The terminal belongs to the UI, so nothing is written to
//! stdout or stderr once it is up.

use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_ENV: &str = "CINETRACK_LOG";
const LOG_FILE_PREFIX: &str = "cinetrack.log";

/// `$XDG_DATA_HOME/cinetrack/logs`, or the temp dir without a data dir
pub fn logs_dir() -> PathBuf {
  dirs::data_dir()
    .unwrap_or_else(std::env::temp_dir)
    .join("cinetrack")
    .join("logs")
}

/// Install a subscriber that writes to a daily rolling file.
///
/// The level comes from `CINETRACK_LOG` (`info` when unset). Keep the
/// returned guard alive until exit or buffered lines are lost.
pub fn init_logger() -> Result<WorkerGuard> {
  let dir = logs_dir();
  std::fs::create_dir_all(&dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", dir.display(), e))?;

  let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
  let (writer, guard) = tracing_appender::non_blocking(appender);

  let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
  let file_layer = tracing_subscriber::fmt::layer()
    .with_ansi(false)
    .with_target(false)
    .with_writer(writer)
    .with_filter(filter);

  tracing_subscriber::registry()
    .with(file_layer)
    .try_init()
    .map_err(|e| eyre!("Failed to install logger: {}", e))?;

  Ok(guard)
}
