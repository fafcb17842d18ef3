use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use color_eyre::eyre::{eyre, Result};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Sends tracing output to the configured log file. The terminal belongs to
/// the UI, so nothing is written to stdout or stderr.
///
/// `RUST_LOG` overrides the level picked from the debug flag.
pub fn init_logging(config: &AppConfig) -> Result<()> {
    if let Some(parent) = config.log_file.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    let default_level = if config.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{default_level},sqlx=warn,hyper=warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| eyre!("Failed to initialize logging: {e}"))?;

    tracing::info!(log_file = %config.log_file.display(), "logging initialized");
    Ok(())
}
