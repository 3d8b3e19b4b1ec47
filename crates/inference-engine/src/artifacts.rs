//! Startup Artifact Loading

use crate::classifier::{Classifier, SvmClassifier};
use crate::engine::SatisfactionPipeline;
use crate::onnx::OnnxClassifier;
use crate::scaler::{FittedScaler, Scaler};
use crate::InferenceError;
use data_validator::Validator;
use feature_engine::FEATURE_DIMENSION;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Locations of the three fitted artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactPaths {
    /// Fitted scaler (JSON)
    pub scaler: PathBuf,
    /// Ordered training column names (JSON array)
    pub columns: PathBuf,
    /// Fitted classifier (`.json` SVM or `.onnx`)
    pub classifier: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            scaler: PathBuf::from("artifacts/scaler.json"),
            columns: PathBuf::from("artifacts/columns.json"),
            classifier: PathBuf::from("artifacts/classifier.json"),
        }
    }
}

fn read_artifact(artifact: &'static str, path: &Path) -> Result<String, InferenceError> {
    std::fs::read_to_string(path)
        .map_err(|e| InferenceError::artifact(artifact, format!("{}: {}", path.display(), e)))
}

/// Load the ordered column list
pub fn load_columns(path: &Path) -> Result<Vec<String>, InferenceError> {
    let json = read_artifact("columns", path)?;
    serde_json::from_str(&json).map_err(|e| InferenceError::artifact("columns", e))
}

/// Load the fitted scaler
pub fn load_scaler(path: &Path) -> Result<FittedScaler, InferenceError> {
    let json = read_artifact("scaler", path)?;
    FittedScaler::from_json(&json)
}

/// Load the fitted classifier, choosing the format by file extension
pub fn load_classifier(path: &Path) -> Result<Arc<dyn Classifier>, InferenceError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("onnx") => Ok(Arc::new(OnnxClassifier::load(path, FEATURE_DIMENSION)?)),
        Some("json") => {
            let json = read_artifact("classifier", path)?;
            Ok(Arc::new(SvmClassifier::from_json(&json)?))
        }
        other => Err(InferenceError::artifact(
            "classifier",
            format!("unsupported format {:?} for {}", other, path.display()),
        )),
    }
}

/// Load all artifacts and validate them against each other
pub fn load_pipeline(
    paths: &ArtifactPaths,
    validator: Validator,
) -> Result<SatisfactionPipeline, InferenceError> {
    info!(
        "Loading artifacts: scaler={}, columns={}, classifier={}",
        paths.scaler.display(),
        paths.columns.display(),
        paths.classifier.display()
    );

    let columns = load_columns(&paths.columns)?;
    let scaler: Arc<dyn Scaler> = Arc::new(load_scaler(&paths.scaler)?);
    let classifier = load_classifier(&paths.classifier)?;

    SatisfactionPipeline::new(columns, scaler, classifier, validator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Satisfaction;
    use feature_engine::{PassengerRecord, ServiceRatings, COLUMN_NAMES};

    /// Scratch directory removed on drop
    struct ArtifactDir(PathBuf);

    impl ArtifactDir {
        fn new(name: &str) -> Self {
            let dir = std::env::temp_dir().join(format!(
                "satisfaction-artifacts-{}-{}",
                name,
                std::process::id()
            ));
            std::fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }

        fn write(&self, file: &str, contents: &str) -> PathBuf {
            let path = self.0.join(file);
            std::fs::write(&path, contents).unwrap();
            path
        }

        fn write_standard_set(&self) -> ArtifactPaths {
            let columns = serde_json::to_string(&COLUMN_NAMES).unwrap();
            let scaler = serde_json::json!({
                "method": "standard",
                "feature_names": COLUMN_NAMES,
                "mean": vec![0.0; FEATURE_DIMENSION],
                "scale": vec![1.0; FEATURE_DIMENSION],
            });
            // Satisfied iff inflight entertainment rates above 3
            let mut coef = vec![0.0; FEATURE_DIMENSION];
            coef[11] = 1.0;
            let classifier = serde_json::json!({
                "kernel": "linear",
                "coef": coef,
                "intercept": -3.5,
            });

            ArtifactPaths {
                columns: self.write("columns.json", &columns),
                scaler: self.write("scaler.json", &scaler.to_string()),
                classifier: self.write("classifier.json", &classifier.to_string()),
            }
        }
    }

    impl Drop for ArtifactDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn test_load_full_pipeline() {
        let dir = ArtifactDir::new("full");
        let paths = dir.write_standard_set();
        let pipeline = load_pipeline(&paths, Validator::default()).unwrap();
        assert_eq!(pipeline.columns().len(), FEATURE_DIMENSION);

        let mut record = PassengerRecord {
            ratings: ServiceRatings::uniform(2),
            ..Default::default()
        };
        assert_eq!(pipeline.predict(&record).unwrap().prediction, Satisfaction::NotSatisfied);
        record.ratings.inflight_entertainment = 4;
        assert_eq!(pipeline.predict(&record).unwrap().prediction, Satisfaction::Satisfied);
    }

    #[test]
    fn test_missing_artifact_is_load_failure() {
        let dir = ArtifactDir::new("missing");
        let mut paths = dir.write_standard_set();
        paths.scaler = dir.0.join("nope.json");

        assert!(matches!(
            load_pipeline(&paths, Validator::default()),
            Err(InferenceError::ArtifactLoadFailure { artifact: "scaler", .. })
        ));
    }

    #[test]
    fn test_reordered_columns_rejected() {
        let dir = ArtifactDir::new("reordered");
        let mut paths = dir.write_standard_set();
        let mut columns: Vec<&str> = COLUMN_NAMES.to_vec();
        columns.swap(0, 1);
        paths.columns = dir.write("columns.json", &serde_json::to_string(&columns).unwrap());

        assert!(matches!(
            load_pipeline(&paths, Validator::default()),
            Err(InferenceError::ArtifactLoadFailure { artifact: "columns", .. })
        ));
    }

    #[test]
    fn test_corrupt_columns_rejected() {
        let dir = ArtifactDir::new("corrupt");
        let path = dir.write("columns.json", "{\"not\": \"a list\"}");
        assert!(load_columns(&path).is_err());
    }

    #[test]
    fn test_unsupported_classifier_format() {
        let dir = ArtifactDir::new("format");
        let path = dir.write("svm_flight.pkl", "binary");
        assert!(matches!(
            load_classifier(&path),
            Err(InferenceError::ArtifactLoadFailure { artifact: "classifier", .. })
        ));
    }
}
