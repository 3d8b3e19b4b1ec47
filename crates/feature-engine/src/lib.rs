//! Feature Engineering Engine
//!
//! Maps categorical passenger labels to integer codes and assembles the
//! 22-column feature vector the satisfaction classifier was trained on.

mod encoder;
mod features;
mod record;

pub use encoder::{CategoryEncoder, CustomerType, Gender, TravelClass, TravelType};
pub use features::{FeatureBuilder, FeatureVector, COLUMN_NAMES, FEATURE_DIMENSION};
pub use record::{PassengerRecord, ServiceRatings};

use thiserror::Error;

/// Errors during feature assembly
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureError {
    #[error("Invalid {field} category: {label:?}")]
    InvalidCategory { field: &'static str, label: String },
}
