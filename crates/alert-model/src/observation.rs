//! Weather observation types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One timestamped set of metric readings for a location.
///
/// Observations arrive normalized from the ingest side; each metric is
/// optional since upstream providers report different subsets. An absent
/// metric is skipped by every rule that references it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// Location this reading belongs to
    pub location_id: i64,
    /// Id of the stored reading, when the source persisted one
    pub observation_id: Option<i64>,
    /// Reading timestamp; alerts fall back to evaluation time when absent
    pub recorded_at: Option<DateTime<Utc>>,
    /// Air temperature (°C)
    pub temperature: Option<f64>,
    /// Precipitation amount (mm)
    pub precipitation: Option<f64>,
    /// Wind speed (m/s)
    pub wind_speed: Option<f64>,
    /// Relative humidity (%)
    pub humidity: Option<f64>,
    /// Which upstream supplied this reading
    pub data_source: String,
}

impl Observation {
    /// Create an observation with no metric values set.
    pub fn empty(location_id: i64, data_source: &str) -> Self {
        Self {
            location_id,
            observation_id: None,
            recorded_at: None,
            temperature: None,
            precipitation: None,
            wind_speed: None,
            humidity: None,
            data_source: data_source.to_string(),
        }
    }
}
