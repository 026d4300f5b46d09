//! Observation Validator for Range Checking

use crate::error::ValidationError;
use alert_model::Observation;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Temperature valid range (°C)
    pub temperature_range: (f64, f64),
    /// Precipitation valid range (mm)
    pub precipitation_range: (f64, f64),
    /// Wind speed valid range (m/s)
    pub wind_speed_range: (f64, f64),
    /// Relative humidity valid range (%)
    pub humidity_range: (f64, f64),
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            temperature_range: (-90.0, 60.0),
            precipitation_range: (0.0, 500.0),
            wind_speed_range: (0.0, 150.0),
            humidity_range: (0.0, 100.0),
        }
    }
}

/// Result of validating one observation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether every present field is valid
    pub valid: bool,
    /// List of validation errors
    pub errors: Vec<ValidationError>,
    /// Number of fields checked
    pub fields_checked: usize,
}

/// Range validator for normalized weather observations
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with the given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite { field });
        }
        if value < range.0 || value > range.1 {
            return Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            });
        }
        Ok(())
    }

    /// Validate all present fields of an observation, collecting every
    /// violation rather than stopping at the first.
    pub fn validate(&self, observation: &Observation) -> ValidationResult {
        let mut errors = Vec::new();
        let mut fields_checked = 0;

        if observation.location_id <= 0 {
            errors.push(ValidationError::InvalidLocation(observation.location_id));
        }
        if observation.data_source.trim().is_empty() {
            errors.push(ValidationError::MissingSource);
        }

        let checks = [
            ("temperature", observation.temperature, self.config.temperature_range),
            ("precipitation", observation.precipitation, self.config.precipitation_range),
            ("wind_speed", observation.wind_speed, self.config.wind_speed_range),
            ("humidity", observation.humidity, self.config.humidity_range),
        ];

        for (field, value, range) in checks {
            if let Some(value) = value {
                fields_checked += 1;
                if let Err(e) = self.validate_range(field, value, range) {
                    errors.push(e);
                }
            }
        }

        debug!(
            location_id = observation.location_id,
            fields_checked,
            errors = errors.len(),
            "Validated observation"
        );

        ValidationResult {
            valid: errors.is_empty(),
            errors,
            fields_checked,
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn observation_with(temperature: Option<f64>, humidity: Option<f64>) -> Observation {
        Observation {
            temperature,
            humidity,
            ..Observation::empty(1, "open-meteo")
        }
    }

    #[test]
    fn test_valid_observation() {
        let validator = Validator::default();
        let result = validator.validate(&observation_with(Some(21.5), Some(64.0)));
        assert!(result.valid);
        assert_eq!(result.fields_checked, 2);
    }

    #[test]
    fn test_absent_fields_are_not_checked() {
        let validator = Validator::default();
        let result = validator.validate(&observation_with(None, None));
        assert!(result.valid);
        assert_eq!(result.fields_checked, 0);
    }

    #[test]
    fn test_humidity_out_of_range() {
        let validator = Validator::default();
        let result = validator.validate(&observation_with(None, Some(104.0)));
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec![ValidationError::OutOfRange {
                field: "humidity",
                value: 104.0,
                min: 0.0,
                max: 100.0,
            }]
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        let validator = Validator::default();
        let result = validator.validate(&observation_with(Some(f64::NAN), None));
        assert!(!result.valid);
        assert_eq!(result.errors, vec![ValidationError::NotFinite { field: "temperature" }]);
    }

    #[test]
    fn test_collects_all_violations() {
        let validator = Validator::default();
        let mut observation = observation_with(Some(900.0), Some(-4.0));
        observation.location_id = 0;
        let result = validator.validate(&observation);
        assert_eq!(result.errors.len(), 3);
    }

    proptest! {
        #[test]
        fn humidity_in_range_always_passes(humidity in 0.0f64..=100.0) {
            let validator = Validator::default();
            let result = validator.validate(&observation_with(None, Some(humidity)));
            prop_assert!(result.valid);
        }

        #[test]
        fn humidity_above_range_always_fails(excess in 0.001f64..1000.0) {
            let validator = Validator::default();
            let result = validator.validate(&observation_with(None, Some(100.0 + excess)));
            prop_assert!(!result.valid);
        }
    }
}
