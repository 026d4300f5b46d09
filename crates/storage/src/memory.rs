//! In-memory store implementation

use std::sync::Mutex;

use alert_model::{Alert, AlertCandidate, AlertType};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::store::{AlertStore, DeactivateOutcome};
use crate::StorageError;

struct Inner {
    alerts: Vec<Alert>,
    next_id: i64,
}

/// In-memory alert store.
///
/// All operations take the single interior mutex, which also makes the
/// deactivate update a first-transition-wins single-row guard.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        info!("Creating in-memory alert store");
        Self {
            inner: Mutex::new(Inner {
                alerts: Vec::with_capacity(1000),
                next_id: 1,
            }),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StorageError> {
        self.inner
            .lock()
            .map_err(|e| StorageError::Unavailable(format!("lock error: {e}")))
    }

    /// Total number of stored alerts
    pub fn alert_count(&self) -> usize {
        self.inner.lock().map(|i| i.alerts.len()).unwrap_or(0)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertStore for MemoryStore {
    fn insert(&self, candidate: AlertCandidate) -> Result<Alert, StorageError> {
        let mut inner = self.lock()?;
        let id = inner.next_id;
        inner.next_id += 1;

        let alert = Alert::from_candidate(id, candidate);
        inner.alerts.push(alert.clone());
        debug!(alert_id = id, "Inserted alert");
        Ok(alert)
    }

    fn get(&self, id: i64) -> Result<Option<Alert>, StorageError> {
        let inner = self.lock()?;
        Ok(inner.alerts.iter().find(|a| a.id == id).cloned())
    }

    fn find_active(
        &self,
        location_id: i64,
        alert_type: AlertType,
        started_after: DateTime<Utc>,
    ) -> Result<Option<Alert>, StorageError> {
        let inner = self.lock()?;
        Ok(inner
            .alerts
            .iter()
            .find(|a| {
                a.is_active
                    && a.location_id == location_id
                    && a.alert_type == alert_type
                    && a.started_at >= started_after
            })
            .cloned())
    }

    fn deactivate(
        &self,
        id: i64,
        ended_at: DateTime<Utc>,
    ) -> Result<DeactivateOutcome, StorageError> {
        let mut inner = self.lock()?;
        let alert = inner
            .alerts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(StorageError::NotFound(id))?;

        if !alert.is_active {
            return Ok(DeactivateOutcome::AlreadyInactive);
        }

        alert.is_active = false;
        alert.ended_at = Some(ended_at);
        debug!(alert_id = id, "Deactivated alert");
        Ok(DeactivateOutcome::Deactivated)
    }

    fn list_active(&self, location_id: Option<i64>) -> Result<Vec<Alert>, StorageError> {
        let inner = self.lock()?;
        let mut active: Vec<Alert> = inner
            .alerts
            .iter()
            .filter(|a| a.is_active && location_id.map_or(true, |id| a.location_id == id))
            .cloned()
            .collect();
        active.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(active)
    }

    fn started_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Alert>, StorageError> {
        let inner = self.lock()?;
        Ok(inner
            .alerts
            .iter()
            .filter(|a| a.started_at >= cutoff)
            .cloned()
            .collect())
    }
}
