//! Statistics Aggregator
//!
//! Read-only rollups over the alert history for a trailing window. Runs
//! concurrently with ingestion and may observe a stale snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use alert_model::AlertStatistics;
use chrono::{Duration, Utc};
use storage::AlertStore;
use tracing::debug;

use crate::EngineError;

/// Computes alert statistics from the persisted store.
pub struct StatisticsAggregator<S: AlertStore> {
    store: Arc<S>,
}

impl<S: AlertStore> StatisticsAggregator<S> {
    /// Create an aggregator over the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Roll up alerts whose start timestamp falls within the trailing
    /// `window_days`.
    ///
    /// An empty window yields zeroed counts and no most-affected location,
    /// never an error.
    pub fn statistics(&self, window_days: i64) -> Result<AlertStatistics, EngineError> {
        let cutoff = Utc::now() - Duration::days(window_days);
        let alerts = self.store.started_since(cutoff).map_err(EngineError::from_store)?;

        let mut stats = AlertStatistics::default();
        let mut by_location: HashMap<i64, u64> = HashMap::new();

        for alert in &alerts {
            stats.total += 1;
            if alert.is_active {
                stats.active += 1;
            }
            *stats.by_type.entry(alert.alert_type).or_insert(0) += 1;
            *stats.by_risk_tier.entry(alert.risk_tier).or_insert(0) += 1;
            *by_location.entry(alert.location_id).or_insert(0) += 1;
        }

        // Highest count wins; on equal counts the smallest location id does.
        stats.most_affected_location = by_location
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
            .map(|(location_id, _)| location_id);

        debug!(window_days, total = stats.total, "Computed alert statistics");
        Ok(stats)
    }
}
