//! Alert Lifecycle Manager
//!
//! Owns the Active → Inactive state machine and the create/deactivate/query
//! operations. Nothing else writes to an alert after creation.

use std::sync::Arc;

use alert_model::{Alert, AlertCandidate};
use chrono::Utc;
use storage::{AlertStore, DeactivateOutcome};
use tracing::info;

use crate::EngineError;

/// Create, deactivate, and query persisted alerts.
pub struct AlertLifecycle<S: AlertStore> {
    store: Arc<S>,
}

impl<S: AlertStore> Clone for AlertLifecycle<S> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store) }
    }
}

impl<S: AlertStore> AlertLifecycle<S> {
    /// Create a lifecycle manager over the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Persist an admitted candidate as a new active alert.
    ///
    /// Store-level conflicts propagate unchanged so the deduplication gate
    /// can treat them as duplicates.
    pub fn create(&self, candidate: AlertCandidate) -> Result<Alert, EngineError> {
        let alert = self.store.insert(candidate)?;
        info!(
            alert_id = alert.id,
            location_id = alert.location_id,
            alert_type = %alert.alert_type,
            risk_tier = %alert.risk_tier,
            "Created alert"
        );
        Ok(alert)
    }

    /// Deactivate an alert, returning whether this call observed the state
    /// change.
    ///
    /// Deactivating an already-inactive alert is a no-op success; its end
    /// timestamp is never re-stamped. An unknown id fails with `NotFound`.
    pub fn deactivate(&self, id: i64) -> Result<bool, EngineError> {
        match self.store.deactivate(id, Utc::now()) {
            Ok(DeactivateOutcome::Deactivated) => {
                info!(alert_id = id, "Deactivated alert");
                Ok(true)
            }
            Ok(DeactivateOutcome::AlreadyInactive) => Ok(false),
            Err(e) => Err(EngineError::from_store(e)),
        }
    }

    /// Fetch one alert by id, failing with `NotFound` if absent.
    pub fn get(&self, id: i64) -> Result<Alert, EngineError> {
        self.store
            .get(id)
            .map_err(EngineError::from_store)?
            .ok_or(EngineError::NotFound(id))
    }

    /// Active alerts, optionally restricted to one location, newest first.
    pub fn list_active(&self, location_id: Option<i64>) -> Result<Vec<Alert>, EngineError> {
        self.store.list_active(location_id).map_err(EngineError::from_store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alert_model::{AlertType, RiskTier, Severity};
    use storage::MemoryStore;

    fn candidate(location_id: i64) -> AlertCandidate {
        AlertCandidate {
            location_id,
            observation_id: None,
            alert_type: AlertType::HighTemperature,
            risk_tier: RiskTier::Alto,
            severity: Severity::Advisory,
            threshold_value: 40.0,
            observed_value: 42.0,
            description: "test".to_string(),
            recommendations: "test".to_string(),
            started_at: Utc::now(),
        }
    }

    fn lifecycle() -> AlertLifecycle<MemoryStore> {
        AlertLifecycle::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_create_returns_active_alert() {
        let lifecycle = lifecycle();
        let alert = lifecycle.create(candidate(1)).unwrap();
        assert!(alert.is_active);
        assert!(alert.ended_at.is_none());
        assert_eq!(lifecycle.get(alert.id).unwrap().id, alert.id);
    }

    #[test]
    fn test_deactivate_unknown_id_is_not_found() {
        let err = lifecycle().deactivate(404).unwrap_err();
        assert!(matches!(err, EngineError::NotFound(404)));
    }

    #[test]
    fn test_deactivate_twice_is_idempotent() {
        let lifecycle = lifecycle();
        let alert = lifecycle.create(candidate(1)).unwrap();

        assert!(lifecycle.deactivate(alert.id).unwrap());
        let first = lifecycle.get(alert.id).unwrap().ended_at;
        assert!(first.is_some());

        assert!(!lifecycle.deactivate(alert.id).unwrap());
        assert_eq!(lifecycle.get(alert.id).unwrap().ended_at, first);
    }

    #[test]
    fn test_active_invariant_after_deactivation() {
        let lifecycle = lifecycle();
        let alert = lifecycle.create(candidate(1)).unwrap();
        lifecycle.deactivate(alert.id).unwrap();

        let stored = lifecycle.get(alert.id).unwrap();
        assert!(!stored.is_active);
        assert!(stored.ended_at.is_some());
        assert!(lifecycle.list_active(Some(1)).unwrap().is_empty());
    }

    #[test]
    fn test_get_unknown_id() {
        let err = lifecycle().get(7).unwrap_err();
        assert!(matches!(err, EngineError::NotFound(7)));
    }
}
