//! # Logging Setup
//!
//! Installs the global `tracing` subscriber: stdout plus a per-session log
//! file under the configured log directory.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::domain::config::SystemConfig;

pub const SESSION_LOG: &str = "session.log";
const DEFAULT_FILTER: &str =
    "info,matrix_sdk=warn,matrix_sdk_base=warn,matrix_sdk_crypto=error,ruma=warn,hyper=warn";

/// Keep the returned guard alive for as long as logs should be flushed to file.
pub fn init(config: &SystemConfig) -> Result<WorkerGuard> {
    let log_dir = Path::new(&config.log_dir);
    if !log_dir.exists() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Clear previous session log
    let log_path = log_dir.join(SESSION_LOG);
    if log_path.exists() {
        let _ = fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, SESSION_LOG);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);
    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
