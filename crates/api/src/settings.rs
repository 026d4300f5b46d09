//! Service configuration
//!
//! Settings are layered: built-in defaults, then an optional
//! `weather-alert` config file, then `WEATHER_ALERT__*` environment
//! variables.

use alert_engine::{EngineConfig, WorkerConfig};
use data_validator::ValidationConfig;
use serde::Deserialize;

/// Top-level service settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Engine policy constants
    pub engine: EngineConfig,
    /// Ingest retry policy
    pub worker: WorkerConfig,
    /// Observation range validation
    pub validation: ValidationConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            engine: EngineConfig::default(),
            worker: WorkerConfig::default(),
            validation: ValidationConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from file and environment on top of defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("weather-alert").required(false))
            .add_source(config::Environment::with_prefix("WEATHER_ALERT").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Socket address string for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.bind_addr(), "0.0.0.0:8000");
        assert_eq!(settings.engine.suppression_window_hours, 24);
        assert_eq!(settings.worker.max_retries, 3);
    }
}
