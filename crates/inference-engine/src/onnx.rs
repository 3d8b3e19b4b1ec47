//! ONNX Classifier using tract
//!
//! Runs a classifier exported to ONNX (for example with `skl2onnx`). The graph
//! takes a `[1, n_features]` float tensor; output 0 holds the predicted label.

use crate::classifier::Classifier;
use crate::engine::Satisfaction;
use crate::InferenceError;
use std::path::Path;
use tracing::{debug, info};
use tract_onnx::prelude::*;

type OnnxPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Classifier backed by an optimized tract plan
pub struct OnnxClassifier {
    plan: OnnxPlan,
    n_features: usize,
    model_path: String,
}

impl OnnxClassifier {
    /// Load and optimize an ONNX model with a fixed `[1, n_features]` input
    pub fn load(path: &Path, n_features: usize) -> Result<Self, InferenceError> {
        info!("Loading ONNX classifier from {}", path.display());

        let plan = Self::build_plan(path, n_features)
            .map_err(|e| InferenceError::artifact("classifier", e))?;

        Ok(Self {
            plan,
            n_features,
            model_path: path.display().to_string(),
        })
    }

    fn build_plan(path: &Path, n_features: usize) -> TractResult<OnnxPlan> {
        tract_onnx::onnx()
            .model_for_path(path)?
            .with_input_fact(0, f32::fact([1, n_features]).into())?
            .into_optimized()?
            .into_runnable()
    }

    /// Get model path
    pub fn model_path(&self) -> &str {
        &self.model_path
    }

    fn read_label(output: &Tensor) -> Result<i64, InferenceError> {
        if let Ok(view) = output.to_array_view::<i64>() {
            return view
                .iter()
                .next()
                .copied()
                .ok_or_else(|| InferenceError::InferenceFailed("empty label tensor".to_string()));
        }

        // Graphs without a label output emit a single positive-class score
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;
        let score = view
            .iter()
            .next()
            .copied()
            .ok_or_else(|| InferenceError::InferenceFailed("empty score tensor".to_string()))?;
        Ok(if score >= 0.5 { 1 } else { 0 })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, features: &[f64]) -> Result<Satisfaction, InferenceError> {
        if features.len() != self.n_features {
            return Err(InferenceError::ShapeMismatch {
                stage: "classifier",
                expected: self.n_features,
                actual: features.len(),
            });
        }

        let data: Vec<f32> = features.iter().map(|v| *v as f32).collect();
        let input = Tensor::from_shape(&[1, self.n_features], &data)
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;
        let output = outputs
            .first()
            .ok_or_else(|| InferenceError::InferenceFailed("model produced no outputs".to_string()))?;

        let label = Self::read_label(output)?;
        debug!("ONNX label {}", label);
        Satisfaction::from_label(label)
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn describe(&self) -> String {
        format!("onnx({}, {} features)", self.model_path, self.n_features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_is_load_failure() {
        let path = std::env::temp_dir().join("satisfaction-missing-model.onnx");
        assert!(matches!(
            OnnxClassifier::load(&path, 22),
            Err(InferenceError::ArtifactLoadFailure { artifact: "classifier", .. })
        ));
    }

    #[test]
    fn test_read_label_from_int_tensor() {
        let tensor = Tensor::from_shape(&[1], &[1i64]).unwrap();
        assert_eq!(OnnxClassifier::read_label(&tensor).unwrap(), 1);
    }

    #[test]
    fn test_read_label_from_score_tensor() {
        let tensor = Tensor::from_shape(&[1, 1], &[0.2f32]).unwrap();
        assert_eq!(OnnxClassifier::read_label(&tensor).unwrap(), 0);
    }
}
