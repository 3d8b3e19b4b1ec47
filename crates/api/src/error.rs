//! API Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use feature_engine::FeatureError;
use inference_engine::InferenceError;
use serde::Serialize;
use storage::StorageError;
use thiserror::Error;

/// Errors surfaced by the server
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Logging setup failed: {0}")]
    Logging(String),
    #[error("Rate limiter setup failed: {0}")]
    RateLimit(String),
    #[error("Metrics setup failed: {0}")]
    Metrics(String),
}

/// Per-field detail for rejected input
#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Inference(InferenceError::InvalidInput(_))
            | ApiError::Inference(InferenceError::Feature(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Storage(StorageError::NotFound(_)) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short stable name for the error body
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Inference(e) => e.kind(),
            ApiError::Storage(StorageError::NotFound(_)) => "not_found",
            ApiError::Storage(_) => "storage",
            ApiError::Config(_) => "config",
            ApiError::Io(_) => "io",
            ApiError::Logging(_) => "logging",
            ApiError::RateLimit(_) => "rate_limit",
            ApiError::Metrics(_) => "metrics",
        }
    }

    fn fields(&self) -> Vec<FieldError> {
        match self {
            ApiError::Inference(InferenceError::InvalidInput(errors)) => errors
                .iter()
                .map(|e| FieldError {
                    field: e.field(),
                    message: e.to_string(),
                })
                .collect(),
            ApiError::Inference(InferenceError::Feature(FeatureError::InvalidCategory {
                field,
                ..
            })) => vec![FieldError {
                field: *field,
                message: self.to_string(),
            }],
            _ => Vec::new(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.kind(),
            message: self.to_string(),
            fields: self.fields(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_validator::ValidationError;

    #[test]
    fn test_status_mapping() {
        let invalid = ApiError::from(InferenceError::InvalidInput(vec![ValidationError::OutOfRange {
            field: "age",
            value: 130.0,
            min: 0.0,
            max: 120.0,
        }]));
        assert_eq!(invalid.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(invalid.fields().len(), 1);

        let category = ApiError::from(InferenceError::Feature(FeatureError::InvalidCategory {
            field: "travel_class",
            label: "First".to_string(),
        }));
        assert_eq!(category.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(category.kind(), "invalid_category");
        assert_eq!(category.fields()[0].field, "travel_class");

        let shape = ApiError::from(InferenceError::ShapeMismatch {
            stage: "classifier",
            expected: 22,
            actual: 21,
        });
        assert_eq!(shape.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let missing = ApiError::from(StorageError::NotFound("abc".to_string()));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
