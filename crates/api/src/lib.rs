//! Passenger Satisfaction API Server
//!
//! Serves the passenger form and a JSON API over the satisfaction pipeline.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use data_validator::Validator;
use feature_engine::PassengerRecord;
use inference_engine::{load_pipeline, PredictionResult, SatisfactionPipeline};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use storage::{PredictionRecord, Repository};
use tower_governor::GovernorLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
mod error;
pub mod rate_limit;
mod routes;
pub mod telemetry;

pub use crate::config::{AppConfig, LoggingConfig, ServerConfig};
pub use error::{ApiError, ErrorResponse, FieldError};
pub use rate_limit::{create_governor_config, DefaultGovernorConfig, RateLimitConfig};

/// Application state shared across handlers
pub struct AppState {
    /// Loaded prediction pipeline
    pub pipeline: SatisfactionPipeline,
    /// Latest result per session
    pub repository: Repository,
    /// Prometheus handle, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Create new application state
    pub fn new(
        pipeline: SatisfactionPipeline,
        repository: Repository,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            pipeline,
            repository,
            metrics,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }

    /// Run one submission and record it as the session's latest result
    pub fn submit(
        &self,
        session_id: &str,
        record: &PassengerRecord,
    ) -> Result<PredictionResult, ApiError> {
        let result = match self.pipeline.predict(record) {
            Ok(result) => result,
            Err(e) => {
                warn!("Rejected submission for session {}: {}", session_id, e);
                telemetry::record_error(&e);
                return Err(e.into());
            }
        };
        telemetry::record_prediction(&result);

        self.repository.upsert_latest(PredictionRecord {
            session_id: session_id.to_string(),
            label: result.prediction.label(),
            message: result.prediction.as_str().to_string(),
            timestamp_ms: result.timestamp_ms,
        })?;

        Ok(result)
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub classifier: String,
    pub columns: usize,
    pub active_sessions: usize,
}

/// Create the application router.
///
/// When a governor config is given, only the two POST submission routes are
/// rate limited; they share one quota per peer.
pub fn create_router(state: SharedState, governor: Option<Arc<DefaultGovernorConfig>>) -> Router {
    let mut submit_form = post(routes::form::submit_form);
    let mut create_prediction = post(routes::predictions::create_prediction);
    if let Some(config) = governor {
        submit_form = submit_form.layer(GovernorLayer {
            config: config.clone(),
        });
        create_prediction = create_prediction.layer(GovernorLayer { config });
    }

    Router::new()
        .route("/", get(routes::form::show_form).merge(submit_form))
        .route("/api/v1/predictions", create_prediction)
        .route("/api/v1/health", get(health_handler))
        .route(
            "/api/v1/predictions/latest",
            get(routes::predictions::get_latest).delete(routes::predictions::clear_latest),
        )
        .route("/api/v1/model/columns", get(routes::model::get_columns))
        .route("/metrics", get(telemetry::metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<SharedState>) -> Result<Json<HealthResponse>, ApiError> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let active_sessions = state.repository.session_count()?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        classifier: state.pipeline.describe_classifier(),
        columns: state.pipeline.columns().len(),
        active_sessions,
    }))
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) -> Result<(), ApiError> {
    let level = Level::from_str(&config.level).map_err(|e| ApiError::Logging(e.to_string()))?;
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    let installed = if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    installed.map_err(|e| ApiError::Logging(e.to_string()))
}

/// Load artifacts and run the server until it fails.
///
/// Any artifact problem aborts startup; there is no degraded mode.
pub async fn run_server(config: AppConfig) -> Result<(), ApiError> {
    let pipeline = load_pipeline(&config.artifacts, Validator::new(config.validation.clone()))?;
    let metrics = telemetry::install_recorder()?;
    let state = Arc::new(AppState::new(
        pipeline,
        Repository::with_capacity(config.server.max_sessions),
        Some(metrics),
    ));

    let governor = if config.rate_limit.enabled {
        Some(create_governor_config(&config.rate_limit)?)
    } else {
        None
    };
    let app = create_router(state, governor);

    info!("Starting API server on {}", config.server.addr);

    let listener = tokio::net::TcpListener::bind(&config.server.addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
