//! Rule Evaluator
//!
//! Pure observation → candidate mapping against the threshold catalog.
//! No store access, no side effects.

use std::sync::Arc;

use alert_model::{AlertCandidate, AlertType, Observation, RiskTier};
use chrono::Utc;
use tracing::{debug, warn};

use crate::catalog::{severity_for, CatalogEntry, ThresholdCatalog};

/// Evaluates observations against the threshold catalog.
pub struct RuleEvaluator {
    catalog: Arc<ThresholdCatalog>,
}

impl RuleEvaluator {
    /// Create an evaluator backed by the given catalog.
    pub fn new(catalog: Arc<ThresholdCatalog>) -> Self {
        Self { catalog }
    }

    /// Produce zero or more candidate alerts for one observation.
    ///
    /// Each present metric is evaluated independently; a failure to resolve
    /// one metric's alert type skips that metric only. A single reading can
    /// trigger several types at once.
    pub fn evaluate(&self, observation: &Observation) -> Vec<AlertCandidate> {
        let started_at = observation.recorded_at.unwrap_or_else(Utc::now);
        let mut candidates = Vec::new();

        let metrics: [(&str, Option<f64>, &[AlertType]); 4] = [
            (
                "temperature",
                observation.temperature,
                &[AlertType::HighTemperature, AlertType::LowTemperature],
            ),
            ("precipitation", observation.precipitation, &[AlertType::HeavyRain]),
            ("wind_speed", observation.wind_speed, &[AlertType::StrongWind]),
            ("humidity", observation.humidity, &[AlertType::HighHumidity]),
        ];

        for (metric, value, types) in metrics {
            let Some(value) = value else { continue };
            for &alert_type in types {
                let entry = match self.catalog.entry(alert_type) {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!(metric, %alert_type, error = %e, "Skipping rule for unregistered type");
                        continue;
                    }
                };
                if let Some(tier) = classify(entry, value) {
                    candidates.push(AlertCandidate {
                        location_id: observation.location_id,
                        observation_id: observation.observation_id,
                        alert_type,
                        risk_tier: tier,
                        severity: severity_for(alert_type, tier),
                        threshold_value: entry.tiers.threshold(tier),
                        observed_value: value,
                        description: describe(alert_type, tier, value),
                        recommendations: recommendations_for(alert_type, tier).to_string(),
                        started_at,
                    });
                }
            }
        }

        debug!(
            location_id = observation.location_id,
            candidates = candidates.len(),
            "Evaluated observation"
        );
        candidates
    }
}

/// Select a risk tier for a reading, testing tiers from most severe to
/// least severe and taking the first whose boundary holds.
///
/// The order is mandatory, not an optimization: a value satisfying several
/// boundaries is classified once, at the most severe matching tier, and the
/// result never depends on thresholds being monotonic.
pub fn classify(entry: &CatalogEntry, value: f64) -> Option<RiskTier> {
    RiskTier::DESCENDING
        .iter()
        .copied()
        .find(|&tier| entry.polarity.crossed(value, entry.tiers.threshold(tier)))
}

fn describe(alert_type: AlertType, tier: RiskTier, value: f64) -> String {
    let (label, unit) = match alert_type {
        AlertType::HighTemperature => ("High temperature detected", "°C"),
        AlertType::LowTemperature => ("Low temperature detected", "°C"),
        AlertType::HeavyRain => ("Heavy rainfall detected", "mm"),
        AlertType::StrongWind => ("Strong wind detected", "m/s"),
        AlertType::HighHumidity => ("High humidity detected", "%"),
    };
    format!("{label}: {value:.1}{unit} (risk level: {tier})")
}

fn recommendations_for(alert_type: AlertType, tier: RiskTier) -> &'static str {
    match alert_type {
        AlertType::HighTemperature => match tier {
            RiskTier::Alto | RiskTier::Critico => "Avoid direct sun exposure. Stay hydrated.",
            RiskTier::Medio => "Limit outdoor activities. Wear light clothing.",
            RiskTier::Bajo => "Use sunscreen. Stay hydrated.",
        },
        AlertType::LowTemperature => "Wear appropriate clothing for the cold.",
        AlertType::HeavyRain => "Avoid unnecessary travel. Stay in a safe place.",
        AlertType::StrongWind => "Avoid outdoor activities. Secure loose objects.",
        AlertType::HighHumidity => "Stay hydrated. Seek well-ventilated places.",
    }
}
