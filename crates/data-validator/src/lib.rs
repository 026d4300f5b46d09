//! Observation Validation
//!
//! Range checking for incoming weather observations before rule evaluation.

mod error;
mod validator;

pub use error::ValidationError;
pub use validator::{ValidationConfig, ValidationResult, Validator};
