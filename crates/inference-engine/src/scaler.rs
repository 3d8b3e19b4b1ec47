//! Fitted Feature Scaling

use crate::InferenceError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Applies a previously fitted scaling transform.
///
/// Implementations hold immutable parameters; `transform` never refits.
pub trait Scaler: Send + Sync {
    /// Scale one feature vector, preserving length and column order
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError>;

    /// Number of columns the scaler was fitted on
    fn n_features(&self) -> usize;

    /// Column names recorded at fit time, if the artifact carries them
    fn feature_names(&self) -> Option<&[String]> {
        None
    }
}

/// Scaling method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingMethod {
    /// Z-score: `(x - mean) / scale`
    Standard,
    /// Min-max: `x * scale + min`
    MinMax,
}

/// On-disk scaler layout, mirroring the fitted attributes of the trainer's
/// `StandardScaler` (`mean_`, `scale_`) and `MinMaxScaler` (`min_`, `scale_`).
#[derive(Debug, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
enum ScalerArtifact {
    Standard {
        #[serde(default)]
        feature_names: Option<Vec<String>>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    MinMax {
        #[serde(default)]
        feature_names: Option<Vec<String>>,
        min: Vec<f64>,
        scale: Vec<f64>,
    },
}

/// Scaler with parameters loaded from a fitted artifact
#[derive(Debug, Clone)]
pub struct FittedScaler {
    method: ScalingMethod,
    feature_names: Option<Vec<String>>,
    /// `mean` for Standard, `min` for MinMax
    offset: Vec<f64>,
    scale: Vec<f64>,
}

impl FittedScaler {
    /// Create a scaler from fitted parameters
    pub fn new(
        method: ScalingMethod,
        feature_names: Option<Vec<String>>,
        offset: Vec<f64>,
        scale: Vec<f64>,
    ) -> Result<Self, InferenceError> {
        if offset.is_empty() {
            return Err(InferenceError::artifact("scaler", "no fitted columns"));
        }
        if offset.len() != scale.len() {
            return Err(InferenceError::artifact(
                "scaler",
                format!("{} offsets but {} scale factors", offset.len(), scale.len()),
            ));
        }
        if let Some(names) = &feature_names {
            if names.len() != offset.len() {
                return Err(InferenceError::artifact(
                    "scaler",
                    format!("{} feature names for {} columns", names.len(), offset.len()),
                ));
            }
        }
        if offset.iter().chain(scale.iter()).any(|v| !v.is_finite()) {
            return Err(InferenceError::artifact("scaler", "non-finite parameter"));
        }

        Ok(Self {
            method,
            feature_names,
            offset,
            scale,
        })
    }

    /// Pass-through scaler over the given columns
    pub fn identity(feature_names: Vec<String>) -> Self {
        let n = feature_names.len();
        Self {
            method: ScalingMethod::Standard,
            feature_names: Some(feature_names),
            offset: vec![0.0; n],
            scale: vec![1.0; n],
        }
    }

    /// Parse a scaler artifact from JSON
    pub fn from_json(json: &str) -> Result<Self, InferenceError> {
        let artifact: ScalerArtifact =
            serde_json::from_str(json).map_err(|e| InferenceError::artifact("scaler", e))?;

        match artifact {
            ScalerArtifact::Standard {
                feature_names,
                mean,
                scale,
            } => Self::new(ScalingMethod::Standard, feature_names, mean, scale),
            ScalerArtifact::MinMax {
                feature_names,
                min,
                scale,
            } => Self::new(ScalingMethod::MinMax, feature_names, min, scale),
        }
    }

    pub fn method(&self) -> ScalingMethod {
        self.method
    }
}

impl Scaler for FittedScaler {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        if features.len() != self.offset.len() {
            return Err(InferenceError::ShapeMismatch {
                stage: "scaler",
                expected: self.offset.len(),
                actual: features.len(),
            });
        }

        let scaled: Vec<f64> = features
            .iter()
            .zip(self.offset.iter().zip(self.scale.iter()))
            .map(|(x, (offset, scale))| match self.method {
                ScalingMethod::Standard => {
                    // Constant columns are fitted with a zero scale; treat as 1
                    let scale = if *scale == 0.0 { 1.0 } else { *scale };
                    (x - offset) / scale
                }
                ScalingMethod::MinMax => x * scale + offset,
            })
            .collect();

        debug!("Scaled {} features ({:?})", scaled.len(), self.method);
        Ok(scaled)
    }

    fn n_features(&self) -> usize {
        self.offset.len()
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }
}
