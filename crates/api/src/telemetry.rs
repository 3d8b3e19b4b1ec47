//! Prometheus Metrics
//!
//! Counters and latency histograms for predictions, rendered at `/metrics`.

use crate::error::ApiError;
use crate::SharedState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use inference_engine::{InferenceError, PredictionResult};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder
pub fn install_recorder() -> Result<PrometheusHandle, ApiError> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ApiError::Metrics(e.to_string()))
}

pub fn record_prediction(result: &PredictionResult) {
    counter!("satisfaction_predictions_total", "outcome" => result.prediction.as_str()).increment(1);
    histogram!("satisfaction_prediction_latency_seconds").record(result.latency_us as f64 / 1_000_000.0);
}

pub fn record_error(err: &InferenceError) {
    counter!("satisfaction_prediction_errors_total", "kind" => err.kind()).increment(1);
}

/// Prometheus exposition handler
pub async fn metrics_handler(State(state): State<SharedState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed".to_string()),
    }
}
