//! Threshold Catalog
//!
//! Static, ordered tier tables per alert type, loaded once at startup.
//! Owns the classification policy that is fixed per type: tier thresholds,
//! polarity, and the severity label derived from each tier.

use std::collections::HashMap;

use alert_model::{AlertType, Polarity, RiskTier, Severity};
use serde::{Deserialize, Serialize};

use crate::{EngineConfig, EngineError};

/// Tier thresholds for one alert type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierTable {
    pub bajo: f64,
    pub medio: f64,
    pub alto: f64,
    pub critico: f64,
}

impl TierTable {
    /// Threshold for a given tier.
    pub fn threshold(&self, tier: RiskTier) -> f64 {
        match tier {
            RiskTier::Bajo => self.bajo,
            RiskTier::Medio => self.medio,
            RiskTier::Alto => self.alto,
            RiskTier::Critico => self.critico,
        }
    }
}

/// One registered alert type: its tier table and polarity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub alert_type: AlertType,
    pub tiers: TierTable,
    pub polarity: Polarity,
}

/// Static catalog description of one type, for UI population.
#[derive(Debug, Clone, Serialize)]
pub struct AlertTypeInfo {
    pub alert_type: AlertType,
    pub polarity: Polarity,
    pub tiers: TierTable,
    pub severities: HashMap<RiskTier, Severity>,
}

/// Immutable registry of tier tables, one per alert type.
#[derive(Debug)]
pub struct ThresholdCatalog {
    entries: HashMap<AlertType, CatalogEntry>,
}

impl ThresholdCatalog {
    /// Catalog with the built-in default tables.
    pub fn new() -> Self {
        let entries = AlertType::ALL
            .iter()
            .map(|&alert_type| (alert_type, default_entry(alert_type)))
            .collect();
        Self { entries }
    }

    /// Catalog with per-deployment threshold overrides applied.
    ///
    /// An override keyed by a name outside the registered set fails with
    /// `UnknownAlertType`; overrides replace threshold values only, never
    /// polarity.
    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        let mut catalog = Self::new();
        for (name, table) in &config.threshold_overrides {
            let alert_type = AlertType::parse(name)
                .ok_or_else(|| EngineError::UnknownAlertType(name.clone()))?;
            if let Some(entry) = catalog.entries.get_mut(&alert_type) {
                entry.tiers = *table;
            }
        }
        Ok(catalog)
    }

    /// Look up the table and polarity for an alert type.
    pub fn entry(&self, alert_type: AlertType) -> Result<&CatalogEntry, EngineError> {
        self.entries
            .get(&alert_type)
            .ok_or_else(|| EngineError::UnknownAlertType(alert_type.as_str().to_string()))
    }

    /// Describe every registered type, in the built-in declaration order.
    pub fn describe(&self) -> Vec<AlertTypeInfo> {
        AlertType::ALL
            .iter()
            .filter_map(|&alert_type| self.entries.get(&alert_type))
            .map(|entry| AlertTypeInfo {
                alert_type: entry.alert_type,
                polarity: entry.polarity,
                tiers: entry.tiers,
                severities: RiskTier::DESCENDING
                    .iter()
                    .map(|&tier| (tier, severity_for(entry.alert_type, tier)))
                    .collect(),
            })
            .collect()
    }
}

impl Default for ThresholdCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn default_entry(alert_type: AlertType) -> CatalogEntry {
    let (tiers, polarity) = match alert_type {
        AlertType::HighTemperature => (
            TierTable { bajo: 30.0, medio: 35.0, alto: 40.0, critico: 45.0 },
            Polarity::HighIsBad,
        ),
        AlertType::LowTemperature => (
            TierTable { bajo: 5.0, medio: 0.0, alto: -5.0, critico: -10.0 },
            Polarity::LowIsBad,
        ),
        AlertType::HeavyRain => (
            TierTable { bajo: 10.0, medio: 25.0, alto: 50.0, critico: 100.0 },
            Polarity::HighIsBad,
        ),
        AlertType::StrongWind => (
            TierTable { bajo: 20.0, medio: 35.0, alto: 50.0, critico: 75.0 },
            Polarity::HighIsBad,
        ),
        AlertType::HighHumidity => (
            TierTable { bajo: 80.0, medio: 90.0, alto: 95.0, critico: 98.0 },
            Polarity::HighIsBad,
        ),
    };
    CatalogEntry { alert_type, tiers, polarity }
}

/// Severity label for a type and tier.
pub fn severity_for(alert_type: AlertType, tier: RiskTier) -> Severity {
    let elevated = matches!(tier, RiskTier::Alto | RiskTier::Critico);
    match alert_type {
        AlertType::HighTemperature | AlertType::LowTemperature => {
            if elevated { Severity::Advisory } else { Severity::Warning }
        }
        AlertType::HeavyRain => {
            if elevated { Severity::Watch } else { Severity::Warning }
        }
        AlertType::StrongWind => {
            if elevated { Severity::Advisory } else { Severity::Warning }
        }
        AlertType::HighHumidity => Severity::Info,
    }
}
