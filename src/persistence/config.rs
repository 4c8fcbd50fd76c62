use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const MIN_TICK_MS: u64 = 100;
const MIN_POLL_MS: u64 = 10;

/// User settings stored in config.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Nominal timer tick period
    pub tick_interval_ms: u64,
    /// Longest the event loop waits for input before redrawing
    pub poll_interval_ms: u64,
    /// tracing filter used when RUST_LOG is not set
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: crate::timer::DEFAULT_TICK_MS,
            poll_interval_ms: 250,
            log_filter: "off".to_string(),
        }
    }
}

impl AppConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(MIN_TICK_MS))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(MIN_POLL_MS))
    }
}

/// Load config from config.json, defaults if the file doesn't exist
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config: AppConfig = serde_json::from_str(&content)
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    Ok(config)
}

/// Save config to config.json
pub fn save_config<P: AsRef<Path>>(path: P, config: &AppConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    crate::persistence::atomic_write(path, &json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_nonexistent_config() {
        let temp_dir = tempdir().unwrap();
        let config = load_config(temp_dir.path().join("config.json")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.json");

        let config = AppConfig {
            tick_interval_ms: 500,
            poll_interval_ms: 100,
            log_filter: "chronolog=debug".to_string(),
        };
        save_config(&path, &config).unwrap();

        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"tick_interval_ms": 2000}"#).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.tick_interval_ms, 2000);
        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.log_filter, "off");
    }

    #[test]
    fn test_malformed_config_is_error() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "{ nope").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_intervals_are_clamped() {
        let config = AppConfig {
            tick_interval_ms: 1,
            poll_interval_ms: 0,
            log_filter: String::new(),
        };
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
        assert_eq!(config.poll_interval(), Duration::from_millis(10));
    }
}
