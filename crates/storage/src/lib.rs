//! Storage Layer
//!
//! Keeps the most recent prediction for each session. No history is kept;
//! a new submission overwrites the previous result.

mod repository;

pub use repository::{PredictionRecord, Repository};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
    #[error("No prediction recorded for session {0}")]
    NotFound(String),
}
