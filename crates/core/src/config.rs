//! Tool Configuration
//!
//! Settings for the tailing loop and the adb boundary, stored as TOML in
//! the platform config directory and created with defaults on first run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;

/// Droidtail configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Milliseconds between pid re-resolutions while tailing
    pub poll_interval_ms: u64,
    /// Logcat buffer to read (`main`, `system`, `crash`, ...)
    pub log_buffer: String,
    /// Explicit adb executable; discovered from PATH/ANDROID_HOME when unset
    pub adb_path: Option<PathBuf>,
    /// Device serial to prefer when several are attached
    pub default_device: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1500,
            log_buffer: "main".to_string(),
            adb_path: None,
            default_device: None,
        }
    }
}

impl AppConfig {
    /// Poll interval as a `Duration`, floored at 100ms so a bad config
    /// value cannot hammer adb.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(100))
    }

    /// Platform config file path (`~/.config/droidtail/config.toml` on Linux).
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "droidtail", "droidtail")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load from `path`, writing a default file on first run.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("loading configuration from {}", path.display());
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            info!("creating default configuration at {}", path.display());
            let config = Self::default();
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)?;
            }
            std::fs::write(path, toml::to_string_pretty(&config)?)?;
            Ok(config)
        }
    }

    /// Load from the platform location, falling back to defaults when no
    /// config directory can be resolved.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_or_create(&path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_millis(1500));
        assert_eq!(config.log_buffer, "main");
        assert!(config.adb_path.is_none());
    }

    #[test]
    fn poll_interval_is_floored() {
        let config = AppConfig {
            poll_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str("poll_interval_ms = 500").unwrap();
        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.log_buffer, "main");
    }

    #[test]
    fn load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let created = AppConfig::load_or_create(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created.poll_interval_ms, 1500);

        // Second load reads the file back
        let loaded = AppConfig::load_or_create(&path).unwrap();
        assert_eq!(loaded.log_buffer, created.log_buffer);
    }
}
