//! Threshold Alert Engine
//!
//! Decides, for each incoming weather observation, whether it crosses risk
//! thresholds worth surfacing as an alert, without re-reporting conditions
//! that are still ongoing. Owns rule evaluation, tiered risk
//! classification, duplicate suppression, the alert lifecycle, and
//! statistical rollups over the alert history.

mod catalog;
mod config;
mod dedup;
mod error;
mod evaluator;
mod lifecycle;
mod stats;
mod worker;

pub use catalog::{severity_for, AlertTypeInfo, CatalogEntry, ThresholdCatalog, TierTable};
pub use config::EngineConfig;
pub use dedup::{Admission, DeduplicationGate};
pub use error::EngineError;
pub use evaluator::{classify, RuleEvaluator};
pub use lifecycle::AlertLifecycle;
pub use stats::StatisticsAggregator;
pub use worker::{IngestWorker, ProcessOutcome, ProcessSummary, WorkerConfig};

use std::sync::Arc;

use alert_model::{Alert, AlertCandidate, AlertStatistics, Observation};
use chrono::Duration;
use storage::AlertStore;

/// The assembled engine: catalog, evaluator, gate, lifecycle, and
/// aggregator wired over one store.
///
/// The catalog is built once at construction and immutable afterwards;
/// every collaborator receives it or the store explicitly.
pub struct AlertEngine<S: AlertStore> {
    catalog: Arc<ThresholdCatalog>,
    evaluator: RuleEvaluator,
    gate: DeduplicationGate<S>,
    lifecycle: AlertLifecycle<S>,
    aggregator: StatisticsAggregator<S>,
    config: EngineConfig,
}

impl<S: AlertStore> AlertEngine<S> {
    /// Assemble an engine over a store.
    ///
    /// Fails with `UnknownAlertType` when a configured threshold override
    /// names a type outside the registered set.
    pub fn new(store: Arc<S>, config: EngineConfig) -> Result<Self, EngineError> {
        let catalog = Arc::new(ThresholdCatalog::from_config(&config)?);
        let evaluator = RuleEvaluator::new(Arc::clone(&catalog));
        let lifecycle = AlertLifecycle::new(Arc::clone(&store));
        let gate = DeduplicationGate::new(
            Arc::clone(&store),
            lifecycle.clone(),
            Duration::hours(config.suppression_window_hours),
        );
        let aggregator = StatisticsAggregator::new(store);

        Ok(Self {
            catalog,
            evaluator,
            gate,
            lifecycle,
            aggregator,
            config,
        })
    }

    /// Evaluate an observation into candidate alerts. Pure, no store access.
    pub fn evaluate(&self, observation: &Observation) -> Vec<AlertCandidate> {
        self.evaluator.evaluate(observation)
    }

    /// Push a candidate through the deduplication gate, creating a new
    /// active alert unless suppressed.
    pub async fn admit_and_create(&self, candidate: AlertCandidate) -> Result<Admission, EngineError> {
        self.gate.admit_and_create(candidate).await
    }

    /// Deactivate an alert; `true` when this call observed the transition.
    pub fn deactivate(&self, id: i64) -> Result<bool, EngineError> {
        self.lifecycle.deactivate(id)
    }

    /// Fetch one alert by id.
    pub fn get(&self, id: i64) -> Result<Alert, EngineError> {
        self.lifecycle.get(id)
    }

    /// Active alerts, optionally restricted to one location, newest first.
    pub fn list_active(&self, location_id: Option<i64>) -> Result<Vec<Alert>, EngineError> {
        self.lifecycle.list_active(location_id)
    }

    /// Statistics over the trailing `window_days`.
    pub fn statistics(&self, window_days: i64) -> Result<AlertStatistics, EngineError> {
        self.aggregator.statistics(window_days)
    }

    /// Static catalog of registered alert types for UI population.
    pub fn alert_types(&self) -> Vec<AlertTypeInfo> {
        self.catalog.describe()
    }

    /// Engine policy constants.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
