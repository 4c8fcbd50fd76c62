use crate::persistence::{log_file, AppConfig};
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Pick the log filter: RUST_LOG first, then the config value.
/// Empty, oversized or invalid filters fall back to "off".
pub fn resolve_filter(env_value: Option<&str>, config: &AppConfig) -> EnvFilter {
    env_value
        .map(str::trim)
        .filter(|raw| !raw.is_empty() && raw.len() <= 4096)
        .or_else(|| Some(config.log_filter.trim()).filter(|raw| !raw.is_empty()))
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new("off"))
}

/// Install the global subscriber. Logs go to chronolog.log in the data
/// directory so they never draw over the terminal UI.
pub fn init(data_dir: &Path, config: &AppConfig) -> Result<()> {
    let env_value = std::env::var("RUST_LOG").ok();
    let filter = resolve_filter(env_value.as_deref(), config);
    if filter.to_string() == "off" {
        return Ok(());
    }

    let path = log_file(data_dir);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(filter)
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(())
}
