//! Input Boundary Validation
//!
//! Range checks for the numeric fields of a passenger submission. Values that
//! fail here never reach feature assembly.

mod error;
mod validator;

pub use error::ValidationError;
pub use validator::{Validator, ValidationConfig, ValidationResult, AGE_RANGE, RATING_RANGE};
