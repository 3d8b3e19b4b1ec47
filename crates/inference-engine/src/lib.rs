//! Satisfaction Inference Engine
//!
//! Applies a previously fitted scaler and binary classifier to encoded
//! passenger feature vectors. Artifacts are loaded once, validated against the
//! feature column contract, and shared read-only afterwards.

mod artifacts;
mod classifier;
mod engine;
mod onnx;
mod scaler;

pub use artifacts::{load_classifier, load_columns, load_pipeline, load_scaler, ArtifactPaths};
pub use classifier::{Classifier, SvmClassifier};
pub use engine::{PredictionResult, Satisfaction, SatisfactionPipeline};
pub use onnx::OnnxClassifier;
pub use scaler::{FittedScaler, Scaler, ScalingMethod};

use data_validator::ValidationError;
use feature_engine::FeatureError;
use thiserror::Error;

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Invalid input: {}", join_errors(.0))]
    InvalidInput(Vec<ValidationError>),
    #[error(transparent)]
    Feature(#[from] FeatureError),
    #[error("Shape mismatch at {stage}: expected {expected} features, got {actual}")]
    ShapeMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("Failed to load {artifact} artifact: {reason}")]
    ArtifactLoadFailure { artifact: &'static str, reason: String },
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
}

impl InferenceError {
    /// Short stable name, used as a metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            InferenceError::InvalidInput(_) => "invalid_input",
            InferenceError::Feature(FeatureError::InvalidCategory { .. }) => "invalid_category",
            InferenceError::ShapeMismatch { .. } => "shape_mismatch",
            InferenceError::ArtifactLoadFailure { .. } => "artifact_load_failure",
            InferenceError::InferenceFailed(_) => "inference_failed",
        }
    }

    pub(crate) fn artifact(artifact: &'static str, reason: impl ToString) -> Self {
        InferenceError::ArtifactLoadFailure {
            artifact,
            reason: reason.to_string(),
        }
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
