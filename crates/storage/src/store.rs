//! Alert store trait

use alert_model::{Alert, AlertCandidate, AlertType};
use chrono::{DateTime, Utc};

use crate::StorageError;

/// Outcome of a deactivate operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeactivateOutcome {
    /// This call observed the Active → Inactive transition
    Deactivated,
    /// The alert was already inactive; its end timestamp is untouched
    AlreadyInactive,
}

/// Durable storage operations the alert engine requires.
///
/// Implementations must bound every operation with a deadline and surface
/// expiry as [`StorageError::Timeout`]; the engine treats that as transient
/// and never as a confirmed write. The deactivate update must be guarded so
/// that exactly one of any set of concurrent callers observes
/// [`DeactivateOutcome::Deactivated`].
pub trait AlertStore: Send + Sync {
    /// Persist an admitted candidate as a new active alert and assign its id.
    fn insert(&self, candidate: AlertCandidate) -> Result<Alert, StorageError>;

    /// Fetch one alert by id.
    fn get(&self, id: i64) -> Result<Option<Alert>, StorageError>;

    /// Find an active alert for `(location_id, alert_type)` whose start
    /// timestamp is at or after `started_after`.
    fn find_active(
        &self,
        location_id: i64,
        alert_type: AlertType,
        started_after: DateTime<Utc>,
    ) -> Result<Option<Alert>, StorageError>;

    /// Mark an alert inactive, stamping `ended_at` only on the first
    /// transition.
    fn deactivate(&self, id: i64, ended_at: DateTime<Utc>)
        -> Result<DeactivateOutcome, StorageError>;

    /// All active alerts, optionally restricted to one location, newest
    /// first.
    fn list_active(&self, location_id: Option<i64>) -> Result<Vec<Alert>, StorageError>;

    /// All alerts (active or not) whose start timestamp is at or after
    /// `cutoff`.
    fn started_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Alert>, StorageError>;
}
