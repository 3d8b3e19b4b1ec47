//! Satisfaction Prediction Pipeline

use crate::classifier::Classifier;
use crate::scaler::Scaler;
use crate::InferenceError;
use data_validator::Validator;
use feature_engine::{FeatureBuilder, PassengerRecord, COLUMN_NAMES, FEATURE_DIMENSION};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Binary satisfaction verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Satisfaction {
    /// Label 0
    NotSatisfied,
    /// Label 1
    Satisfied,
}

impl Satisfaction {
    /// Map a classifier label onto the verdict
    pub fn from_label(label: i64) -> Result<Self, InferenceError> {
        match label {
            0 => Ok(Satisfaction::NotSatisfied),
            1 => Ok(Satisfaction::Satisfied),
            other => Err(InferenceError::InferenceFailed(format!(
                "classifier produced label {}, expected 0 or 1",
                other
            ))),
        }
    }

    /// Numeric label
    pub fn label(&self) -> u8 {
        match self {
            Satisfaction::NotSatisfied => 0,
            Satisfaction::Satisfied => 1,
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Satisfaction::NotSatisfied => "Not Satisfied",
            Satisfaction::Satisfied => "Satisfied",
        }
    }

    /// User-facing result line
    pub fn message(&self) -> &'static str {
        match self {
            Satisfaction::NotSatisfied => "Passenger is Not Satisfied",
            Satisfaction::Satisfied => "Passenger is Satisfied",
        }
    }
}

/// Result of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    /// The verdict
    pub prediction: Satisfaction,
    /// End-to-end latency in microseconds
    pub latency_us: u64,
    /// Timestamp when prediction was made
    pub timestamp_ms: u64,
}

/// Validate → encode → scale → classify.
///
/// Holds only immutable state; every call is independent of the last.
pub struct SatisfactionPipeline {
    columns: Vec<String>,
    scaler: Arc<dyn Scaler>,
    classifier: Arc<dyn Classifier>,
    validator: Validator,
}

impl std::fmt::Debug for SatisfactionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SatisfactionPipeline")
            .field("columns", &self.columns.len())
            .field("classifier", &self.classifier.describe())
            .finish()
    }
}

impl SatisfactionPipeline {
    /// Assemble a pipeline, checking the column contract between the loaded
    /// column list, the feature builder and both artifacts.
    pub fn new(
        columns: Vec<String>,
        scaler: Arc<dyn Scaler>,
        classifier: Arc<dyn Classifier>,
        validator: Validator,
    ) -> Result<Self, InferenceError> {
        if columns.len() != FEATURE_DIMENSION {
            return Err(InferenceError::artifact(
                "columns",
                format!("expected {} columns, found {}", FEATURE_DIMENSION, columns.len()),
            ));
        }
        if let Some((idx, (loaded, expected))) = columns
            .iter()
            .zip(COLUMN_NAMES.iter())
            .enumerate()
            .find(|(_, (loaded, expected))| loaded.as_str() != **expected)
        {
            return Err(InferenceError::artifact(
                "columns",
                format!("column {} is {:?}, feature builder emits {:?}", idx + 1, loaded, expected),
            ));
        }

        if scaler.n_features() != FEATURE_DIMENSION {
            return Err(InferenceError::artifact(
                "scaler",
                format!("fitted on {} columns, expected {}", scaler.n_features(), FEATURE_DIMENSION),
            ));
        }
        if let Some(names) = scaler.feature_names() {
            if names != columns.as_slice() {
                return Err(InferenceError::artifact(
                    "scaler",
                    "fitted feature names differ from the column list",
                ));
            }
        }
        if classifier.n_features() != FEATURE_DIMENSION {
            return Err(InferenceError::artifact(
                "classifier",
                format!("fitted on {} columns, expected {}", classifier.n_features(), FEATURE_DIMENSION),
            ));
        }

        info!(
            "Satisfaction pipeline ready: {} columns, classifier {}",
            columns.len(),
            classifier.describe()
        );

        Ok(Self {
            columns,
            scaler,
            classifier,
            validator,
        })
    }

    /// Run the full pipeline on one submission
    pub fn predict(&self, record: &PassengerRecord) -> Result<PredictionResult, InferenceError> {
        let start = std::time::Instant::now();

        record
            .validate(&self.validator)
            .into_result()
            .map_err(InferenceError::InvalidInput)?;

        let features = FeatureBuilder::build(record)?;
        let scaled = self.scaler.transform(features.as_slice())?;
        let prediction = self.classifier.predict(&scaled)?;

        let latency_us = start.elapsed().as_micros() as u64;
        debug!("Prediction {:?} in {}us", prediction, latency_us);

        let timestamp_ms = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        Ok(PredictionResult {
            prediction,
            latency_us,
            timestamp_ms,
        })
    }

    /// Loaded column contract
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Classifier description
    pub fn describe_classifier(&self) -> String {
        self.classifier.describe()
    }
}
