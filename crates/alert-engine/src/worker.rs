//! Ingest Worker
//!
//! Consumes observations from a channel and drives them through
//! validation, evaluation, and the deduplication gate. Each candidate's
//! admit+create path is independently fault-isolated; transient store
//! failures are retried with backoff, and no failure crashes the worker.

use std::sync::Arc;
use std::time::Duration;

use alert_model::{AlertCandidate, Observation};
use data_validator::{ValidationError, Validator};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::dedup::Admission;
use crate::{AlertEngine, EngineError};
use storage::AlertStore;

/// Retry policy for transient store failures
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Maximum retry attempts per candidate
    pub max_retries: u8,
    /// Retry backoff base in milliseconds
    pub retry_backoff_ms: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_backoff_ms: 100,
        }
    }
}

/// Counts for one processed observation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessSummary {
    /// Candidates the evaluator emitted
    pub candidates: usize,
    /// Candidates persisted as new alerts
    pub created: usize,
    /// Candidates dropped as duplicates
    pub suppressed: usize,
    /// Candidates dropped after exhausting retries
    pub failed: usize,
}

/// Result of processing one observation
#[derive(Debug)]
pub enum ProcessOutcome {
    /// Observation failed range validation and was not evaluated
    Rejected { errors: Vec<ValidationError> },
    /// Observation was evaluated; per-candidate counts attached
    Processed(ProcessSummary),
}

/// Observation ingestion worker.
pub struct IngestWorker<S: AlertStore> {
    engine: Arc<AlertEngine<S>>,
    validator: Validator,
    config: WorkerConfig,
}

impl<S: AlertStore> IngestWorker<S> {
    /// Create a worker over the given engine.
    pub fn new(engine: Arc<AlertEngine<S>>, validator: Validator, config: WorkerConfig) -> Self {
        Self { engine, validator, config }
    }

    /// Consume observations from the channel until it closes.
    pub async fn run(&self, mut observations: mpsc::Receiver<Observation>) {
        info!("Starting ingest worker");
        while let Some(observation) = observations.recv().await {
            self.process(&observation).await;
        }
        info!("Ingest worker stopped");
    }

    /// Process a single observation end to end.
    pub async fn process(&self, observation: &Observation) -> ProcessOutcome {
        let report = self.validator.validate(observation);
        if !report.valid {
            warn!(
                location_id = observation.location_id,
                errors = report.errors.len(),
                "Rejected observation failing range validation"
            );
            return ProcessOutcome::Rejected { errors: report.errors };
        }

        let candidates = self.engine.evaluate(observation);
        let mut summary = ProcessSummary {
            candidates: candidates.len(),
            ..ProcessSummary::default()
        };

        for candidate in candidates {
            match self.admit_with_retry(candidate).await {
                Ok(Admission::Created(_)) => summary.created += 1,
                Ok(Admission::Suppressed { .. }) => summary.suppressed += 1,
                Err(e) => {
                    warn!(
                        location_id = observation.location_id,
                        error = %e,
                        "Dropping candidate after persistence failure"
                    );
                    summary.failed += 1;
                }
            }
        }

        ProcessOutcome::Processed(summary)
    }

    async fn admit_with_retry(&self, candidate: AlertCandidate) -> Result<Admission, EngineError> {
        let mut attempt = 0u8;
        loop {
            match self.engine.admit_and_create(candidate.clone()).await {
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    attempt += 1;
                    warn!(attempt, error = %e, "Transient store failure, retrying candidate");
                    sleep(Duration::from_millis(self.config.retry_backoff_ms * u64::from(attempt)))
                        .await;
                }
                other => return other,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EngineConfig;
    use alert_model::{Alert, AlertType};
    use chrono::{DateTime, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use storage::{DeactivateOutcome, MemoryStore, StorageError};

    /// Store that fails the first `failures` inserts, then delegates.
    struct FlakyStore {
        inner: MemoryStore,
        remaining_failures: AtomicUsize,
    }

    impl FlakyStore {
        fn new(failures: usize) -> Self {
            Self {
                inner: MemoryStore::new(),
                remaining_failures: AtomicUsize::new(failures),
            }
        }
    }

    impl AlertStore for FlakyStore {
        fn insert(&self, candidate: AlertCandidate) -> Result<Alert, StorageError> {
            if self
                .remaining_failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(StorageError::Unavailable("injected failure".to_string()));
            }
            self.inner.insert(candidate)
        }

        fn get(&self, id: i64) -> Result<Option<Alert>, StorageError> {
            self.inner.get(id)
        }

        fn find_active(
            &self,
            location_id: i64,
            alert_type: AlertType,
            started_after: DateTime<Utc>,
        ) -> Result<Option<Alert>, StorageError> {
            self.inner.find_active(location_id, alert_type, started_after)
        }

        fn deactivate(
            &self,
            id: i64,
            ended_at: DateTime<Utc>,
        ) -> Result<DeactivateOutcome, StorageError> {
            self.inner.deactivate(id, ended_at)
        }

        fn list_active(&self, location_id: Option<i64>) -> Result<Vec<Alert>, StorageError> {
            self.inner.list_active(location_id)
        }

        fn started_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Alert>, StorageError> {
            self.inner.started_since(cutoff)
        }
    }

    fn worker_over<S: AlertStore>(store: Arc<S>, config: WorkerConfig) -> IngestWorker<S> {
        let engine = Arc::new(AlertEngine::new(store, EngineConfig::default()).unwrap());
        IngestWorker::new(engine, Validator::default(), config)
    }

    fn hot_observation(location_id: i64) -> Observation {
        Observation {
            temperature: Some(46.0),
            recorded_at: Some(Utc::now()),
            ..Observation::empty(location_id, "open-meteo")
        }
    }

    #[tokio::test]
    async fn test_invalid_observation_is_rejected_before_evaluation() {
        let worker = worker_over(Arc::new(MemoryStore::new()), WorkerConfig::default());
        let mut observation = hot_observation(1);
        observation.humidity = Some(250.0);

        let outcome = worker.process(&observation).await;
        assert!(matches!(outcome, ProcessOutcome::Rejected { errors } if errors.len() == 1));
    }

    #[tokio::test]
    async fn test_duplicate_observation_is_suppressed() {
        let worker = worker_over(Arc::new(MemoryStore::new()), WorkerConfig::default());

        let ProcessOutcome::Processed(first) = worker.process(&hot_observation(1)).await else {
            panic!("expected processing");
        };
        assert_eq!(first.created, 1);

        let ProcessOutcome::Processed(second) = worker.process(&hot_observation(1)).await else {
            panic!("expected processing");
        };
        assert_eq!(second.created, 0);
        assert_eq!(second.suppressed, 1);
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried_until_success() {
        let config = WorkerConfig { max_retries: 3, retry_backoff_ms: 1 };
        let worker = worker_over(Arc::new(FlakyStore::new(2)), config);

        let ProcessOutcome::Processed(summary) = worker.process(&hot_observation(1)).await else {
            panic!("expected processing");
        };
        assert_eq!(summary.created, 1);
        assert_eq!(summary.failed, 0);
    }

    #[tokio::test]
    async fn test_exhausted_retries_fail_only_that_candidate() {
        let config = WorkerConfig { max_retries: 2, retry_backoff_ms: 1 };
        let worker = worker_over(Arc::new(FlakyStore::new(100)), config);

        let ProcessOutcome::Processed(summary) = worker.process(&hot_observation(1)).await else {
            panic!("expected processing");
        };
        assert_eq!(summary.candidates, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.created, 0);
    }

    #[tokio::test]
    async fn test_run_drains_channel() {
        let store = Arc::new(MemoryStore::new());
        let worker = worker_over(Arc::clone(&store), WorkerConfig::default());

        let (tx, rx) = mpsc::channel(8);
        tx.send(hot_observation(1)).await.unwrap();
        tx.send(hot_observation(2)).await.unwrap();
        drop(tx);

        worker.run(rx).await;
        assert_eq!(store.alert_count(), 2);
    }
}
