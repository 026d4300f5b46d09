//! Alert types and risk classification

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of risk condition an alert reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertType {
    HighTemperature,
    LowTemperature,
    HeavyRain,
    StrongWind,
    HighHumidity,
}

impl AlertType {
    /// All built-in alert types.
    pub const ALL: [AlertType; 5] = [
        AlertType::HighTemperature,
        AlertType::LowTemperature,
        AlertType::HeavyRain,
        AlertType::StrongWind,
        AlertType::HighHumidity,
    ];

    /// Stable wire name for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::HighTemperature => "high-temperature",
            AlertType::LowTemperature => "low-temperature",
            AlertType::HeavyRain => "heavy-rain",
            AlertType::StrongWind => "strong-wind",
            AlertType::HighHumidity => "high-humidity",
        }
    }

    /// Parse a wire name; `None` for types not in the built-in set.
    pub fn parse(name: &str) -> Option<AlertType> {
        AlertType::ALL.iter().copied().find(|t| t.as_str() == name)
    }
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered risk tier within an alert type: `bajo < medio < alto < crítico`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskTier {
    #[serde(rename = "bajo")]
    Bajo,
    #[serde(rename = "medio")]
    Medio,
    #[serde(rename = "alto")]
    Alto,
    #[serde(rename = "crítico")]
    Critico,
}

impl RiskTier {
    /// Tiers from most severe to least severe, the mandatory evaluation order.
    pub const DESCENDING: [RiskTier; 4] = [
        RiskTier::Critico,
        RiskTier::Alto,
        RiskTier::Medio,
        RiskTier::Bajo,
    ];

    /// Stable wire name for this tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Bajo => "bajo",
            RiskTier::Medio => "medio",
            RiskTier::Alto => "alto",
            RiskTier::Critico => "crítico",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which direction of a threshold crossing is dangerous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Polarity {
    /// Crossed when the value is at or above the tier threshold
    HighIsBad,
    /// Crossed when the value is at or below the tier threshold
    LowIsBad,
}

impl Polarity {
    /// Whether `value` crosses `threshold` for this polarity.
    pub fn crossed(&self, value: f64, threshold: f64) -> bool {
        match self {
            Polarity::HighIsBad => value >= threshold,
            Polarity::LowIsBad => value <= threshold,
        }
    }
}

/// Secondary classification used for downstream triage, derived from
/// type and tier, independent of the tier ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Watch,
    Advisory,
}

impl Severity {
    /// Stable wire name for this severity.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Watch => "watch",
            Severity::Advisory => "advisory",
        }
    }
}

/// An evaluator output that has not yet been checked for duplication
/// or persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertCandidate {
    pub location_id: i64,
    pub observation_id: Option<i64>,
    pub alert_type: AlertType,
    pub risk_tier: RiskTier,
    pub severity: Severity,
    /// Tier threshold that was crossed
    pub threshold_value: f64,
    /// Reading that triggered the crossing
    pub observed_value: f64,
    pub description: String,
    pub recommendations: String,
    pub started_at: DateTime<Utc>,
}

/// A persisted alert. Mutated only by the single deactivate transition.
///
/// Invariant: `is_active == true` exactly when `ended_at` is absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: i64,
    pub location_id: i64,
    pub observation_id: Option<i64>,
    pub alert_type: AlertType,
    pub risk_tier: RiskTier,
    pub severity: Severity,
    pub threshold_value: f64,
    pub observed_value: f64,
    pub description: String,
    pub recommendations: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl Alert {
    /// Materialize an admitted candidate as a new active alert.
    pub fn from_candidate(id: i64, candidate: AlertCandidate) -> Self {
        Self {
            id,
            location_id: candidate.location_id,
            observation_id: candidate.observation_id,
            alert_type: candidate.alert_type,
            risk_tier: candidate.risk_tier,
            severity: candidate.severity,
            threshold_value: candidate.threshold_value,
            observed_value: candidate.observed_value,
            description: candidate.description,
            recommendations: candidate.recommendations,
            started_at: candidate.started_at,
            ended_at: None,
            is_active: true,
        }
    }
}

/// Rollup over the alert history for a trailing time window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertStatistics {
    pub total: u64,
    pub active: u64,
    pub by_type: HashMap<AlertType, u64>,
    pub by_risk_tier: HashMap<RiskTier, u64>,
    /// Location with the most alerts in the window; ties broken by
    /// smallest location id. `None` when the window has no alerts.
    pub most_affected_location: Option<i64>,
}
