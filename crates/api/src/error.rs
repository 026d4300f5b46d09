//! API error mapping

use alert_engine::EngineError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use data_validator::ValidationError;
use serde::Serialize;
use tracing::error;

/// Error surface of the HTTP handlers
#[derive(Debug)]
pub enum ApiError {
    Engine(EngineError),
    Validation(Vec<ValidationError>),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        ApiError::Engine(err)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Engine(EngineError::NotFound(id)) => (
                StatusCode::NOT_FOUND,
                ErrorBody { error: format!("alert {id} not found"), details: None },
            ),
            ApiError::Engine(EngineError::UnknownAlertType(name)) => (
                StatusCode::BAD_REQUEST,
                ErrorBody { error: format!("unknown alert type: {name}"), details: None },
            ),
            ApiError::Engine(EngineError::Store(e)) if e.is_transient() => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorBody { error: "store temporarily unavailable".to_string(), details: None },
            ),
            ApiError::Engine(EngineError::Store(e)) => {
                error!(error = %e, "Unexpected store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody { error: "internal storage failure".to_string(), details: None },
                )
            }
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody {
                    error: "observation failed validation".to_string(),
                    details: Some(errors.iter().map(ToString::to_string).collect()),
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}
