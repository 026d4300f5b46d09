//! Storage Layer
//!
//! The persisted store boundary for alert records. The engine only depends
//! on the [`AlertStore`] trait; [`MemoryStore`] is the reference
//! implementation backing tests and single-node deployments.

mod memory;
mod store;

pub use memory::MemoryStore;
pub use store::{AlertStore, DeactivateOutcome};

use std::time::Duration;

use thiserror::Error;

/// Storage errors
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// Backend cannot be reached or refused the operation
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Operation exceeded its bounded deadline; transient, safe to retry
    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),

    /// No alert with the given id
    #[error("alert {0} not found")]
    NotFound(i64),

    /// Uniqueness violation on insert; an equivalent active alert already
    /// exists for the same location and type
    #[error("active alert already exists for location {location_id}, type {alert_type}")]
    Conflict { location_id: i64, alert_type: String },
}

impl StorageError {
    /// Whether the caller may retry the operation as-is.
    pub fn is_transient(&self) -> bool {
        matches!(self, StorageError::Unavailable(_) | StorageError::Timeout(_))
    }
}
