//! Data Validator for Range Checking

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Passenger age valid range (years)
pub const AGE_RANGE: (f64, f64) = (0.0, 120.0);

/// Service rating scale
pub const RATING_RANGE: (f64, f64) = (1.0, 5.0);

/// Validation configuration.
///
/// Age and rating bounds are part of the model's input contract and are not
/// configurable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    /// Flight distance valid range (miles)
    pub distance_range: (f64, f64),
    /// Departure/arrival delay valid range (minutes)
    pub delay_range: (f64, f64),
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            distance_range: (0.0, u32::MAX as f64),
            delay_range: (0.0, u32::MAX as f64),
        }
    }
}

/// Result of validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether all values are valid
    pub valid: bool,
    /// List of validation errors
    pub errors: Vec<ValidationError>,
    /// Number of fields validated
    pub fields_checked: usize,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid(fields_checked: usize) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            fields_checked,
        }
    }

    /// Create an invalid result with errors
    pub fn invalid(errors: Vec<ValidationError>, fields_checked: usize) -> Self {
        Self {
            valid: false,
            errors,
            fields_checked,
        }
    }

    /// Convert into a `Result`, keeping every collected error
    pub fn into_result(self) -> Result<(), Vec<ValidationError>> {
        if self.valid {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Range validator for passenger form input
#[derive(Debug, Clone)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate a single value against an inclusive range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if value < range.0 || value > range.1 {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Validate passenger age
    pub fn validate_age(&self, age: i64) -> Result<(), ValidationError> {
        self.validate_range("age", age as f64, AGE_RANGE)
    }

    /// Validate a 1-5 service rating
    pub fn validate_rating(&self, field: &'static str, rating: i64) -> Result<(), ValidationError> {
        self.validate_range(field, rating as f64, RATING_RANGE)
    }

    /// Validate flight distance
    pub fn validate_flight_distance(&self, distance: i64) -> Result<(), ValidationError> {
        self.validate_range("flight_distance", distance as f64, self.config.distance_range)
    }

    /// Validate a delay duration in minutes
    pub fn validate_delay(&self, field: &'static str, minutes: i64) -> Result<(), ValidationError> {
        self.validate_range(field, minutes as f64, self.config.delay_range)
    }

    /// Collect a batch of field checks into a single result
    pub fn collect<I>(&self, checks: I) -> ValidationResult
    where
        I: IntoIterator<Item = Result<(), ValidationError>>,
    {
        let mut fields_checked = 0;
        let mut errors = Vec::new();
        for check in checks {
            fields_checked += 1;
            if let Err(e) = check {
                errors.push(e);
            }
        }

        if errors.is_empty() {
            ValidationResult::valid(fields_checked)
        } else {
            debug!("{} of {} fields failed validation", errors.len(), fields_checked);
            ValidationResult::invalid(errors, fields_checked)
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}
