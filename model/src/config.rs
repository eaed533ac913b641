use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::temperature::{MAX_CELSIUS, MIN_CELSIUS};

/// Environment variable naming a JSON file that overrides the embedded defaults.
pub const CONFIG_ENV: &str = "TEMPMON_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Settings of the simulated sensor loop.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub tick_interval_ms: u64,
    pub history_capacity: usize,
    pub log_capacity: usize,
    pub initial_temperature: f32,
    /// Largest random perturbation per tick, in °C.
    pub max_step: f32,
    pub start_running: bool,
    /// Fixed seed for reproducible runs. Derived from the clock when absent.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            history_capacity: 20,
            log_capacity: 11,
            initial_temperature: 25.0,
            max_step: 1.0,
            start_running: true,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// The defaults shipped with the crate.
    pub fn embedded() -> Result<Self, ConfigError> {
        let json_data = std::include_str!("./default_config.json");

        Self::from_json(json_data)
    }

    pub fn from_json(json_data: &str) -> Result<Self, ConfigError> {
        let config = serde_json::from_str::<Self>(json_data)?;
        config.validate()?;

        Ok(config)
    }

    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let json_data = std::fs::read_to_string(path)?;

        Self::from_json(&json_data)
    }

    /// Loads the file named by `TEMPMON_CONFIG`, or the embedded defaults when it is unset.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(std::env::var(CONFIG_ENV))
    }

    fn load_from(path: Result<String, std::env::VarError>) -> Result<Self, ConfigError> {
        match path {
            Ok(path) => {
                log::info!("Loading simulation config from {path}");
                Self::from_file(path)
            }
            Err(std::env::VarError::NotPresent) => Self::embedded(),
            Err(std::env::VarError::NotUnicode(raw)) => {
                log::warn!("Ignoring {CONFIG_ENV}={raw:?}: not valid unicode, using defaults");
                Self::embedded()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("tick_interval_ms must be positive".into()));
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::Invalid("history_capacity must be positive".into()));
        }
        if self.log_capacity == 0 {
            return Err(ConfigError::Invalid("log_capacity must be positive".into()));
        }
        if !self.max_step.is_finite() || self.max_step < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "max_step must be a non-negative number, got {}",
                self.max_step
            )));
        }
        if !(MIN_CELSIUS..=MAX_CELSIUS).contains(&self.initial_temperature) {
            return Err(ConfigError::Invalid(format!(
                "initial_temperature {} is outside [{MIN_CELSIUS}, {MAX_CELSIUS}]",
                self.initial_temperature
            )));
        }

        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_matches_defaults() {
        let config = SimulationConfig::embedded().unwrap();

        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config = SimulationConfig::from_json(r#"{ "seed": 7, "log_capacity": 5 }"#).unwrap();

        assert_eq!(config.seed, Some(7));
        assert_eq!(config.log_capacity, 5);
        assert_eq!(config.history_capacity, 20);
    }

    #[test]
    fn rejects_invalid_values() {
        let zero_interval = SimulationConfig::from_json(r#"{ "tick_interval_ms": 0 }"#);
        assert!(matches!(zero_interval, Err(ConfigError::Invalid(_))));

        let too_hot = SimulationConfig::from_json(r#"{ "initial_temperature": 75.0 }"#);
        assert!(matches!(too_hot, Err(ConfigError::Invalid(_))));

        let broken = SimulationConfig::from_json("{ not json");
        assert!(matches!(broken, Err(ConfigError::Json(_))));
    }

    #[test]
    fn load_follows_environment() {
        let path = std::env::temp_dir().join(format!("tempmon-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "tick_interval_ms": 250, "start_running": false }"#).unwrap();

        // Restore whatever the surrounding shell exported.
        let previous = std::env::var_os(CONFIG_ENV);
        std::env::set_var(CONFIG_ENV, &path);
        let loaded = SimulationConfig::load();
        match previous {
            Some(value) => std::env::set_var(CONFIG_ENV, value),
            None => std::env::remove_var(CONFIG_ENV),
        }
        std::fs::remove_file(&path).unwrap();

        let config = loaded.unwrap();
        assert_eq!(config.tick_interval(), Duration::from_millis(250));
        assert!(!config.start_running);
    }

    #[test]
    fn unset_or_garbled_variable_uses_defaults() {
        let unset = SimulationConfig::load_from(Err(std::env::VarError::NotPresent));
        assert_eq!(unset.unwrap(), SimulationConfig::default());

        let garbled = SimulationConfig::load_from(Err(std::env::VarError::NotUnicode(
            std::ffi::OsString::from("tempmon-\u{fffd}.json"),
        )));
        assert_eq!(garbled.unwrap(), SimulationConfig::default());
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = SimulationConfig::from_file("/nonexistent/tempmon.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
