//! Alert Routes

use std::sync::Arc;

use alert_engine::AlertTypeInfo;
use alert_model::Alert;
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::AppState;

/// Query parameters for the active alerts endpoint
#[derive(Debug, Deserialize)]
pub struct ActiveQuery {
    /// Restrict to one location
    pub location_id: Option<i64>,
}

/// Response for the active alerts endpoint
#[derive(Debug, Serialize)]
pub struct AlertListResponse {
    pub count: usize,
    pub data: Vec<Alert>,
}

/// Active alerts, optionally filtered by location, newest first.
pub async fn list_active(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ActiveQuery>,
) -> Result<Json<AlertListResponse>, ApiError> {
    let data = state.engine.list_active(params.location_id)?;
    Ok(Json(AlertListResponse { count: data.len(), data }))
}

/// One alert by id.
pub async fn get_alert(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Alert>, ApiError> {
    Ok(Json(state.engine.get(id)?))
}

/// Response for the deactivate endpoint
#[derive(Debug, Serialize)]
pub struct DeactivateResponse {
    pub id: i64,
    /// Whether this request observed the Active → Inactive transition
    pub changed: bool,
    pub ended_at: Option<DateTime<Utc>>,
}

/// Deactivate an alert. Repeat calls are no-op successes.
pub async fn deactivate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<DeactivateResponse>, ApiError> {
    let changed = state.engine.deactivate(id)?;
    let alert = state.engine.get(id)?;
    Ok(Json(DeactivateResponse { id, changed, ended_at: alert.ended_at }))
}

/// Query parameters for the statistics endpoint
#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    /// Trailing window in days; engine default when absent
    pub days: Option<i64>,
}

/// Alert statistics over a trailing window.
pub async fn statistics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatsQuery>,
) -> Result<Json<alert_model::AlertStatistics>, ApiError> {
    let days = params
        .days
        .unwrap_or(state.engine.config().default_stats_window_days);
    Ok(Json(state.engine.statistics(days)?))
}

/// Static catalog of alert types, tiers, and severities.
pub async fn alert_types(State(state): State<Arc<AppState>>) -> Json<Vec<AlertTypeInfo>> {
    Json(state.engine.alert_types())
}
