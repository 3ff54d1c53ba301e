use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::project_dirs;

const DEFAULT_LOG_FILTER: &str = "vidwall=info";

/// Directory for rolling log files: the platform data dir, or the temp dir.
pub fn logs_dir() -> PathBuf {
  project_dirs().map(|dirs| dirs.data_local_dir().join("logs")).unwrap_or_else(|| std::env::temp_dir().join("vidwall"))
}

/// Install a file-only tracing subscriber. The terminal belongs to the UI, so
/// nothing is written to stdout/stderr. Keep the returned guard alive for the
/// whole program or buffered lines are lost.
pub fn init() -> Result<WorkerGuard> {
  let dir = logs_dir();
  std::fs::create_dir_all(&dir).with_context(|| format!("Failed to create log directory {}", dir.display()))?;

  let file_appender = tracing_appender::rolling::daily(&dir, "vidwall.log");
  let (writer, guard) = tracing_appender::non_blocking(file_appender);
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

  tracing_subscriber::registry()
    .with(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false))
    .with(filter)
    .try_init()
    .context("Failed to install tracing subscriber")?;

  Ok(guard)
}
