//! Engine configuration

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::TierTable;

/// Policy constants for the alert engine.
///
/// The suppression window and statistics window are configurable defaults
/// copied from observed operational behavior, not hard invariants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Hours during which a repeat breach of the same (location, type)
    /// is not re-reported
    pub suppression_window_hours: i64,
    /// Trailing window for statistics queries when the caller gives none
    /// (days)
    pub default_stats_window_days: i64,
    /// Per-deployment threshold overrides, keyed by alert type wire name
    pub threshold_overrides: HashMap<String, TierTable>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            suppression_window_hours: 24,
            default_stats_window_days: 30,
            threshold_overrides: HashMap::new(),
        }
    }
}
