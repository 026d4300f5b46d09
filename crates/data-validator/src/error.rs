//! Validation Error Types

use thiserror::Error;

/// Errors during observation validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value out of allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// NaN or infinite reading
    #[error("{field} value is not a finite number")]
    NotFinite { field: &'static str },

    /// Location references must be positive
    #[error("location id {0} is not a valid reference")]
    InvalidLocation(i64),

    /// Provenance tag missing
    #[error("observation carries no data source tag")]
    MissingSource,
}
