//! Engine Error Types

use storage::StorageError;
use thiserror::Error;

/// Errors surfaced by engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    /// Alert type is not registered in the threshold catalog
    #[error("unknown alert type: {0}")]
    UnknownAlertType(String),

    /// No alert with the given id
    #[error("alert {0} not found")]
    NotFound(i64),

    /// Persisted store failure
    #[error(transparent)]
    Store(#[from] StorageError),
}

impl EngineError {
    /// Whether the caller may retry the operation as-is.
    pub fn is_transient(&self) -> bool {
        matches!(self, EngineError::Store(e) if e.is_transient())
    }

    /// Lift a store error, promoting missing-row failures to the engine's
    /// own `NotFound`.
    pub(crate) fn from_store(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(id) => EngineError::NotFound(id),
            other => EngineError::Store(other),
        }
    }
}
