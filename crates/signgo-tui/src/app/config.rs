//! Client configuration persistence
//!
//! Saves and loads the API endpoint, timings and map export settings.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use signgo_core::{Coordinates, IncidentMode, DEFAULT_BASE_URL};

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Log file name, next to the config file
const LOG_FILE_NAME: &str = "signgo.log";

/// Configuration directory under ~/.config
const CONFIG_DIR_NAME: &str = "signgo";

/// Client configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Booking API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// How long the splash screen stays up, in seconds
    #[serde(default = "default_splash_delay_secs")]
    pub splash_delay_secs: u64,

    /// Whether incident reports are uploaded or only acknowledged
    #[serde(default)]
    pub incident_mode: IncidentMode,

    /// Nominatim-compatible geocoder; no geocoding when unset
    #[serde(default)]
    pub geocoder_url: Option<String>,

    /// The user's position; unset means location is unavailable
    #[serde(default)]
    pub user_location: Option<Coordinates>,

    /// Where "Export Map" writes the HTML document
    #[serde(default = "default_map_export_path")]
    pub map_export_path: PathBuf,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_splash_delay_secs() -> u64 {
    3
}

fn default_map_export_path() -> PathBuf {
    PathBuf::from("signgo-route.html")
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            splash_delay_secs: default_splash_delay_secs(),
            incident_mode: IncidentMode::default(),
            geocoder_url: None,
            user_location: None,
            map_export_path: default_map_export_path(),
        }
    }
}

impl ClientConfig {
    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg_config).join(CONFIG_DIR_NAME));
        }

        dirs::config_dir().map(|p| p.join(CONFIG_DIR_NAME))
    }

    /// Get the full config file path
    pub fn config_file_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join(CONFIG_FILE_NAME))
    }

    /// Get the log file path
    pub fn log_file_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join(LOG_FILE_NAME))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn splash_delay(&self) -> Duration {
        Duration::from_secs(self.splash_delay_secs)
    }

    /// Load configuration from disk
    ///
    /// Returns default configuration if file doesn't exist or can't be parsed.
    pub fn load() -> Self {
        match Self::config_file_path() {
            Some(path) => Self::load_or_create(&path),
            None => Self::default(),
        }
    }

    /// Like [`ClientConfig::load_from`], but writes the defaults out on first run
    pub fn load_or_create(path: &Path) -> Self {
        if path.exists() {
            return Self::load_from(path);
        }

        let config = Self::default();
        if let Err(e) = config.save_to(path) {
            tracing::warn!("Failed to write default config: {}", e);
        }
        config
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file: {}", e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    /// Save configuration to a specific file, creating its directory
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| ConfigError::Io(e.to_string()))?;
            }
        }

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(path, contents).map_err(|e| ConfigError::Io(e.to_string()))?;

        tracing::debug!("Saved config to {:?}", path);
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.splash_delay(), Duration::from_secs(3));
        assert_eq!(config.incident_mode, IncidentMode::Upload);
        assert!(config.geocoder_url.is_none());
        assert!(config.user_location.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let parsed: ClientConfig =
            serde_json::from_str(r#"{ "base_url": "https://api.example.ph", "incident_mode": "acknowledge" }"#)
                .unwrap();

        assert_eq!(parsed.base_url, "https://api.example.ph");
        assert_eq!(parsed.incident_mode, IncidentMode::Acknowledge);
        assert_eq!(parsed.timeout_secs, 10);
        assert_eq!(parsed.map_export_path, PathBuf::from("signgo-route.html"));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let config = ClientConfig {
            base_url: "http://10.0.0.5:5000".into(),
            user_location: Some(Coordinates::new(7.1907, 125.4553)),
            splash_delay_secs: 0,
            ..ClientConfig::default()
        };
        config.save_to(&path).unwrap();

        assert_eq!(ClientConfig::load_from(&path), config);
    }

    #[test]
    fn test_first_run_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signgo").join(CONFIG_FILE_NAME);

        assert_eq!(ClientConfig::load_or_create(&path), ClientConfig::default());
        assert!(path.exists());

        let mut edited = ClientConfig::load_from(&path);
        edited.splash_delay_secs = 1;
        edited.save_to(&path).unwrap();
        assert_eq!(ClientConfig::load_or_create(&path), edited);
    }

    #[test]
    fn test_missing_or_corrupt_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        assert_eq!(ClientConfig::load_from(&path), ClientConfig::default());

        fs::write(&path, "{ not json").unwrap();
        assert_eq!(ClientConfig::load_from(&path), ClientConfig::default());
    }

    #[test]
    fn test_zero_timeout_is_clamped() {
        let config = ClientConfig {
            timeout_secs: 0,
            ..ClientConfig::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(1));
    }
}
