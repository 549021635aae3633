//! Configuration for the window alarm agent.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::alert::AlertPolicy;
use crate::core::tracker::WindowFilter;

/// Main configuration for the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// How often the monitor polls the window set
    #[serde(with = "duration_millis")]
    pub poll_interval: Duration,

    /// Which windows count as the watched popup
    pub filter: WindowFilter,

    /// When and how to sound the alarm
    pub policy: AlertPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            filter: WindowFilter::default(),
            policy: AlertPolicy::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// A missing file yields the defaults; a malformed one is an error so
    /// a typo cannot silently disarm the alarm.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content =
                std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
            let config: Config =
                serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        std::fs::write(&config_path, content).map_err(|e| ConfigError::Io(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("window-alarm")
            .join("config.json")
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Serialize error: {0}")]
    Serialize(String),
}

/// Serde support for `Duration` as whole milliseconds.
pub mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alert::{AudioMode, IdleMode};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.poll_interval, Duration::from_millis(500));
        assert_eq!(config.filter.process_name.as_deref(), Some("Time Doctor"));
        assert_eq!(config.policy.max_duration, Duration::from_secs(60));
        assert_eq!(config.policy.idle_mode, IdleMode::Ignore);
        assert_eq!(config.policy.audio_mode, AudioMode::Continuous);
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let mut config = Config::default();
        config.poll_interval = Duration::from_millis(250);
        config.policy.idle_mode = IdleMode::RequireIdle;
        config.policy.audio_mode = AudioMode::PeriodicBeep;
        config.filter.min_width = 300;

        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.poll_interval, Duration::from_millis(250));
        assert_eq!(parsed.policy.idle_mode, IdleMode::RequireIdle);
        assert_eq!(parsed.policy.audio_mode, AudioMode::PeriodicBeep);
        assert_eq!(parsed.filter.min_width, 300);
    }

    #[test]
    fn test_malformed_config_is_an_error_not_defaults() {
        let path = std::env::temp_dir().join("window-alarm-config-parse-test.json");
        std::fs::write(&path, "{ \"poll_interval\": ").unwrap();

        // A typo must not silently disarm the alarm by falling back to
        // defaults.
        let result = Config::load_from(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_config_yields_defaults() {
        let path = std::env::temp_dir().join("window-alarm-config-missing-test.json");
        let _ = std::fs::remove_file(&path);

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.poll_interval, Duration::from_millis(500));
    }

    #[test]
    fn test_policy_mode_names_are_stable() {
        // Config files use snake_case policy names.
        let json = serde_json::to_string(&IdleMode::RequireActive).unwrap();
        assert_eq!(json, "\"require_active\"");
        let json = serde_json::to_string(&AudioMode::PeriodicBeep).unwrap();
        assert_eq!(json, "\"periodic_beep\"");
    }
}
