//! Feature Vector Assembly

use crate::encoder::CategoryEncoder;
use crate::record::PassengerRecord;
use crate::FeatureError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of features in the vector
pub const FEATURE_DIMENSION: usize = 22;

/// Column names in training order. The scaler and classifier artifacts are
/// fitted against exactly this sequence.
pub const COLUMN_NAMES: [&str; FEATURE_DIMENSION] = [
    "Gender",
    "Customer Type",
    "Age",
    "Type of Travel",
    "Class",
    "Flight Distance",
    "Seat comfort",
    "Departure/Arrival time convenient",
    "Food and drink",
    "Gate location",
    "Inflight wifi service",
    "Inflight entertainment",
    "Online support",
    "Ease of Online booking",
    "On-board service",
    "Leg room service",
    "Baggage handling",
    "Checkin service",
    "Cleanliness",
    "Online boarding",
    "Departure Delay in Minutes",
    "Arrival Delay in Minutes",
];

/// Encoded feature vector for ML inference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Raw feature values (22 dimensions, `COLUMN_NAMES` order)
    pub values: Vec<f64>,
}

impl FeatureVector {
    /// Value of a named column
    pub fn get(&self, column: &str) -> Option<f64> {
        COLUMN_NAMES
            .iter()
            .position(|name| *name == column)
            .and_then(|idx| self.values.get(idx).copied())
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self {
            values: vec![0.0; FEATURE_DIMENSION],
        }
    }
}

/// Builds feature vectors from passenger records
pub struct FeatureBuilder;

impl FeatureBuilder {
    /// Encode categories and lay out all 22 columns.
    ///
    /// Numeric fields pass through unchanged; there are no derived features.
    pub fn build(record: &PassengerRecord) -> Result<FeatureVector, FeatureError> {
        let gender = CategoryEncoder::encode_gender(&record.gender)?;
        let customer_type = CategoryEncoder::encode_customer_type(&record.customer_type)?;
        let travel_type = CategoryEncoder::encode_travel_type(&record.travel_type)?;
        let travel_class = CategoryEncoder::encode_travel_class(&record.travel_class)?;

        let mut values = Vec::with_capacity(FEATURE_DIMENSION);
        values.push(gender as f64);
        values.push(customer_type as f64);
        values.push(record.age as f64);
        values.push(travel_type as f64);
        values.push(travel_class as f64);
        values.push(record.flight_distance as f64);
        values.extend(
            record
                .ratings
                .in_column_order()
                .iter()
                .map(|(_, rating)| *rating as f64),
        );
        values.push(record.departure_delay_minutes as f64);
        values.push(record.arrival_delay_minutes as f64);

        debug_assert_eq!(values.len(), FEATURE_DIMENSION);
        debug!("Built feature vector with {} columns", values.len());

        Ok(FeatureVector { values })
    }
}
