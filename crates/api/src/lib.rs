//! Weather Alert API Server
//!
//! REST surface over the threshold alert engine. Routing, request
//! validation, and status mapping only; all decision logic lives in
//! `alert-engine`.

use std::sync::Arc;
use std::time::Instant;

use alert_engine::{AlertEngine, IngestWorker};
use anyhow::Context;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use data_validator::Validator;
use serde::Serialize;
use storage::MemoryStore;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod error;
mod routes;
mod settings;

pub use error::ApiError;
pub use settings::Settings;

/// Application state shared across handlers
pub struct AppState {
    /// Assembled alert engine
    pub engine: Arc<AlertEngine<MemoryStore>>,
    /// Ingest path shared with channel-driven workers
    pub worker: IngestWorker<MemoryStore>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: Instant,
}

impl AppState {
    /// Build the state from loaded settings.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let store = Arc::new(MemoryStore::new());
        let engine = Arc::new(
            AlertEngine::new(Arc::clone(&store), settings.engine.clone())
                .context("building alert engine")?,
        );
        let worker = IngestWorker::new(
            Arc::clone(&engine),
            Validator::new(settings.validation.clone()),
            settings.worker.clone(),
        );

        Ok(Self {
            engine,
            worker,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: Instant::now(),
        })
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/observations", post(routes::observations::ingest))
        .route("/api/v1/alerts/active", get(routes::alerts::list_active))
        .route("/api/v1/alerts/statistics", get(routes::alerts::statistics))
        .route("/api/v1/alerts/types", get(routes::alerts::alert_types))
        .route("/api/v1/alerts/:id", get(routes::alerts::get_alert))
        .route("/api/v1/alerts/:id/deactivate", post(routes::alerts::deactivate))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Run the server until shutdown
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let state = Arc::new(AppState::from_settings(&settings)?);
    let app = create_router(state);

    let addr = settings.bind_addr();
    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app).await.context("serving requests")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_builds_from_default_settings() {
        let state = Arc::new(AppState::from_settings(&Settings::default()).unwrap());
        let _router = create_router(state);
    }

    #[test]
    fn test_alert_type_catalog_serializes_wire_names() {
        let state = AppState::from_settings(&Settings::default()).unwrap();
        let json = serde_json::to_value(state.engine.alert_types()).unwrap();

        let types: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["alert_type"].as_str().unwrap())
            .collect();
        assert!(types.contains(&"high-temperature"));
        assert!(json[0]["severities"].get("crítico").is_some());
    }
}
