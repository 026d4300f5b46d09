//! Deduplication Gate
//!
//! Admits a candidate only when no active alert of the same
//! (location, type) started within the trailing suppression window. The
//! check-then-insert is serialized per key so concurrent evaluations of the
//! same pair cannot create overlapping alerts.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use alert_model::{Alert, AlertCandidate, AlertType};
use chrono::{Duration, Utc};
use storage::{AlertStore, StorageError};
use tokio::sync::Mutex;
use tracing::debug;

use crate::lifecycle::AlertLifecycle;
use crate::EngineError;

/// Outcome of pushing a candidate through the gate.
#[derive(Debug, Clone)]
pub enum Admission {
    /// No duplicate found; a new active alert was persisted
    Created(Alert),
    /// An active alert for the same (location, type) already covers this
    /// condition within the suppression window
    Suppressed { existing_id: Option<i64> },
}

impl Admission {
    /// Whether a new alert was persisted.
    pub fn created(&self) -> bool {
        matches!(self, Admission::Created(_))
    }
}

type Key = (i64, AlertType);

/// Suppression gate in front of alert creation.
pub struct DeduplicationGate<S: AlertStore> {
    store: Arc<S>,
    lifecycle: AlertLifecycle<S>,
    window: Duration,
    locks: StdMutex<HashMap<Key, Arc<Mutex<()>>>>,
}

impl<S: AlertStore> DeduplicationGate<S> {
    /// Create a gate with the given suppression window.
    pub fn new(store: Arc<S>, lifecycle: AlertLifecycle<S>, window: Duration) -> Self {
        Self {
            store,
            lifecycle,
            window,
            locks: StdMutex::new(HashMap::new()),
        }
    }

    /// Check the store for a recent active duplicate and create the alert
    /// if none exists.
    ///
    /// A store-level uniqueness conflict during creation means another
    /// worker won the race; it is reported as a suppression, never as an
    /// error. Transient store failures propagate so the caller can retry;
    /// a candidate is only ever reported created after the store confirmed
    /// the insert.
    pub async fn admit_and_create(&self, candidate: AlertCandidate) -> Result<Admission, EngineError> {
        let key = (candidate.location_id, candidate.alert_type);
        let lock = self.key_lock(key)?;
        let _guard = lock.lock().await;

        let since = Utc::now() - self.window;
        if let Some(existing) = self
            .store
            .find_active(key.0, key.1, since)
            .map_err(EngineError::from_store)?
        {
            debug!(
                location_id = key.0,
                alert_type = %key.1,
                existing_id = existing.id,
                "Candidate suppressed by active alert"
            );
            return Ok(Admission::Suppressed { existing_id: Some(existing.id) });
        }

        match self.lifecycle.create(candidate) {
            Ok(alert) => Ok(Admission::Created(alert)),
            Err(EngineError::Store(StorageError::Conflict { .. })) => {
                let existing = self
                    .store
                    .find_active(key.0, key.1, since)
                    .map_err(EngineError::from_store)?;
                debug!(
                    location_id = key.0,
                    alert_type = %key.1,
                    "Candidate lost create race, treated as duplicate"
                );
                Ok(Admission::Suppressed { existing_id: existing.map(|a| a.id) })
            }
            Err(e) => Err(e),
        }
    }

    fn key_lock(&self, key: Key) -> Result<Arc<Mutex<()>>, EngineError> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|e| EngineError::Store(StorageError::Unavailable(format!("lock error: {e}"))))?;
        Ok(Arc::clone(locks.entry(key).or_insert_with(|| Arc::new(Mutex::new(())))))
    }
}
