//! Observation Ingest Route

use std::sync::Arc;

use alert_engine::{ProcessOutcome, ProcessSummary};
use alert_model::Observation;
use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::AppState;

/// Ingest one observation: validate, evaluate, and admit each candidate.
pub async fn ingest(
    State(state): State<Arc<AppState>>,
    Json(observation): Json<Observation>,
) -> Result<Json<ProcessSummary>, ApiError> {
    match state.worker.process(&observation).await {
        ProcessOutcome::Rejected { errors } => Err(ApiError::Validation(errors)),
        ProcessOutcome::Processed(summary) => Ok(Json(summary)),
    }
}
