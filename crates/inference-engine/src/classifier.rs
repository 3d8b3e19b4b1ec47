//! Binary Classifier Adapters

use crate::engine::Satisfaction;
use crate::InferenceError;
use ndarray::{Array1, Array2, ArrayView1};
use serde::Deserialize;
use tracing::debug;

/// Applies a previously fitted binary classifier to a scaled feature vector.
pub trait Classifier: Send + Sync {
    /// Predict exactly one label for one scaled vector
    fn predict(&self, features: &[f64]) -> Result<Satisfaction, InferenceError>;

    /// Number of columns the classifier was fitted on
    fn n_features(&self) -> usize;

    /// Human-readable model description for logs and health output
    fn describe(&self) -> String;
}

fn default_classes() -> [i64; 2] {
    [0, 1]
}

/// On-disk SVM layout, mirroring the trainer's fitted SVC attributes
/// (`coef_` or `support_vectors_`/`dual_coef_`, `intercept_`, `classes_`).
#[derive(Debug, Deserialize)]
#[serde(tag = "kernel", rename_all = "snake_case")]
enum SvmArtifact {
    Linear {
        coef: Vec<f64>,
        intercept: f64,
        #[serde(default = "default_classes")]
        classes: [i64; 2],
    },
    Rbf {
        gamma: f64,
        support_vectors: Vec<Vec<f64>>,
        dual_coef: Vec<f64>,
        intercept: f64,
        #[serde(default = "default_classes")]
        classes: [i64; 2],
    },
}

#[derive(Debug, Clone)]
enum SvmKernel {
    /// f(x) = w·x + b
    Linear { weights: Array1<f64> },
    /// f(x) = Σ αᵢ·exp(-γ||x - xᵢ||²) + b
    Rbf {
        gamma: f64,
        support_vectors: Array2<f64>,
        dual_coef: Array1<f64>,
    },
}

/// Support vector classifier evaluated from fitted parameters
#[derive(Debug, Clone)]
pub struct SvmClassifier {
    kernel: SvmKernel,
    intercept: f64,
    /// Label for a non-positive decision, then for a positive one
    classes: [i64; 2],
    n_features: usize,
}

impl SvmClassifier {
    /// Linear-kernel classifier
    pub fn linear(weights: Vec<f64>, intercept: f64) -> Result<Self, InferenceError> {
        Self::linear_with_classes(weights, intercept, default_classes())
    }

    fn linear_with_classes(
        weights: Vec<f64>,
        intercept: f64,
        classes: [i64; 2],
    ) -> Result<Self, InferenceError> {
        if weights.is_empty() {
            return Err(InferenceError::artifact("classifier", "empty weight vector"));
        }
        let n_features = weights.len();
        Ok(Self {
            kernel: SvmKernel::Linear {
                weights: Array1::from(weights),
            },
            intercept,
            classes,
            n_features,
        })
    }

    /// RBF-kernel classifier
    pub fn rbf(
        gamma: f64,
        support_vectors: Vec<Vec<f64>>,
        dual_coef: Vec<f64>,
        intercept: f64,
    ) -> Result<Self, InferenceError> {
        Self::rbf_with_classes(gamma, support_vectors, dual_coef, intercept, default_classes())
    }

    fn rbf_with_classes(
        gamma: f64,
        support_vectors: Vec<Vec<f64>>,
        dual_coef: Vec<f64>,
        intercept: f64,
        classes: [i64; 2],
    ) -> Result<Self, InferenceError> {
        let n_support = support_vectors.len();
        let n_features = support_vectors.first().map(Vec::len).unwrap_or(0);
        if n_support == 0 || n_features == 0 {
            return Err(InferenceError::artifact("classifier", "no support vectors"));
        }
        if dual_coef.len() != n_support {
            return Err(InferenceError::artifact(
                "classifier",
                format!("{} dual coefficients for {} support vectors", dual_coef.len(), n_support),
            ));
        }
        if !(gamma.is_finite() && gamma > 0.0) {
            return Err(InferenceError::artifact("classifier", format!("invalid gamma {}", gamma)));
        }
        if let Some(row) = support_vectors.iter().position(|sv| sv.len() != n_features) {
            return Err(InferenceError::artifact(
                "classifier",
                format!("support vector {} has {} columns, expected {}", row, support_vectors[row].len(), n_features),
            ));
        }

        let flat: Vec<f64> = support_vectors.into_iter().flatten().collect();
        let support_vectors = Array2::from_shape_vec((n_support, n_features), flat)
            .map_err(|e| InferenceError::artifact("classifier", e))?;

        Ok(Self {
            kernel: SvmKernel::Rbf {
                gamma,
                support_vectors,
                dual_coef: Array1::from(dual_coef),
            },
            intercept,
            classes,
            n_features,
        })
    }

    /// Parse an SVM artifact from JSON
    pub fn from_json(json: &str) -> Result<Self, InferenceError> {
        let artifact: SvmArtifact =
            serde_json::from_str(json).map_err(|e| InferenceError::artifact("classifier", e))?;

        match artifact {
            SvmArtifact::Linear {
                coef,
                intercept,
                classes,
            } => Self::linear_with_classes(coef, intercept, classes),
            SvmArtifact::Rbf {
                gamma,
                support_vectors,
                dual_coef,
                intercept,
                classes,
            } => Self::rbf_with_classes(gamma, support_vectors, dual_coef, intercept, classes),
        }
    }

    /// Signed distance from the separating surface
    pub fn decision_function(&self, features: &[f64]) -> Result<f64, InferenceError> {
        if features.len() != self.n_features {
            return Err(InferenceError::ShapeMismatch {
                stage: "classifier",
                expected: self.n_features,
                actual: features.len(),
            });
        }
        let x = ArrayView1::from(features);

        let raw = match &self.kernel {
            SvmKernel::Linear { weights } => weights.dot(&x),
            SvmKernel::Rbf {
                gamma,
                support_vectors,
                dual_coef,
            } => support_vectors
                .rows()
                .into_iter()
                .zip(dual_coef.iter())
                .map(|(sv, alpha)| {
                    let sq_dist: f64 = sv.iter().zip(x.iter()).map(|(a, b)| (a - b) * (a - b)).sum();
                    alpha * (-gamma * sq_dist).exp()
                })
                .sum::<f64>(),
        };

        Ok(raw + self.intercept)
    }
}

impl Classifier for SvmClassifier {
    fn predict(&self, features: &[f64]) -> Result<Satisfaction, InferenceError> {
        let decision = self.decision_function(features)?;
        let label = if decision > 0.0 {
            self.classes[1]
        } else {
            self.classes[0]
        };
        debug!("SVM decision {:.4} -> label {}", decision, label);
        Satisfaction::from_label(label)
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn describe(&self) -> String {
        match &self.kernel {
            SvmKernel::Linear { .. } => format!("svm(linear, {} features)", self.n_features),
            SvmKernel::Rbf {
                gamma,
                support_vectors,
                ..
            } => format!(
                "svm(rbf, gamma={}, {} support vectors, {} features)",
                gamma,
                support_vectors.nrows(),
                self.n_features
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_decision() {
        let svm = SvmClassifier::linear(vec![1.0, -1.0], 0.5).unwrap();
        assert_eq!(svm.decision_function(&[2.0, 1.0]).unwrap(), 1.5);
        assert_eq!(svm.predict(&[2.0, 1.0]).unwrap(), Satisfaction::Satisfied);
        assert_eq!(svm.predict(&[0.0, 3.0]).unwrap(), Satisfaction::NotSatisfied);
    }

    #[test]
    fn test_zero_decision_is_negative_class() {
        let svm = SvmClassifier::linear(vec![1.0], 0.0).unwrap();
        assert_eq!(svm.predict(&[0.0]).unwrap(), Satisfaction::NotSatisfied);
    }

    #[test]
    fn test_rbf_decision() {
        // Positive support vector at the origin, negative one at (4, 4)
        let svm = SvmClassifier::rbf(
            0.5,
            vec![vec![0.0, 0.0], vec![4.0, 4.0]],
            vec![1.0, -1.0],
            0.0,
        )
        .unwrap();

        assert_eq!(svm.predict(&[0.1, -0.2]).unwrap(), Satisfaction::Satisfied);
        assert_eq!(svm.predict(&[3.9, 4.2]).unwrap(), Satisfaction::NotSatisfied);

        let at_origin = svm.decision_function(&[0.0, 0.0]).unwrap();
        let expected = 1.0 - (-0.5f64 * 32.0).exp();
        assert!((at_origin - expected).abs() < 1e-12);
    }

    #[test]
    fn test_short_vector_is_shape_mismatch() {
        let svm = SvmClassifier::linear(vec![0.1; 22], 0.0).unwrap();
        let scaled = vec![0.0; 21];
        assert!(matches!(
            svm.predict(&scaled),
            Err(InferenceError::ShapeMismatch {
                stage: "classifier",
                expected: 22,
                actual: 21
            })
        ));
    }

    #[test]
    fn test_from_json_with_class_labels() {
        let json = r#"{"kernel": "linear", "coef": [2.0, 0.0], "intercept": -1.0, "classes": [1, 0]}"#;
        let svm = SvmClassifier::from_json(json).unwrap();
        // Positive decision maps to classes[1] = 0
        assert_eq!(svm.predict(&[1.0, 0.0]).unwrap(), Satisfaction::NotSatisfied);
        assert_eq!(svm.n_features(), 2);
    }

    #[test]
    fn test_unexpected_label_fails() {
        let json = r#"{"kernel": "linear", "coef": [1.0], "intercept": 0.0, "classes": [0, 7]}"#;
        let svm = SvmClassifier::from_json(json).unwrap();
        assert!(matches!(
            svm.predict(&[1.0]),
            Err(InferenceError::InferenceFailed(_))
        ));
    }

    #[test]
    fn test_malformed_rbf_rejected() {
        let ragged = r#"{"kernel": "rbf", "gamma": 0.1, "support_vectors": [[0.0, 1.0], [2.0]],
                         "dual_coef": [1.0, -1.0], "intercept": 0.0}"#;
        assert!(matches!(
            SvmClassifier::from_json(ragged),
            Err(InferenceError::ArtifactLoadFailure { artifact: "classifier", .. })
        ));

        let coef_count = r#"{"kernel": "rbf", "gamma": 0.1, "support_vectors": [[0.0]],
                             "dual_coef": [1.0, -1.0], "intercept": 0.0}"#;
        assert!(SvmClassifier::from_json(coef_count).is_err());

        let no_gamma = r#"{"kernel": "rbf", "gamma": 0.0, "support_vectors": [[0.0]],
                           "dual_coef": [1.0], "intercept": 0.0}"#;
        assert!(SvmClassifier::from_json(no_gamma).is_err());
    }
}
