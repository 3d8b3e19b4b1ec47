//! Repository Implementation

use crate::StorageError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

/// Latest prediction for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub session_id: String,
    /// 0 = not satisfied, 1 = satisfied
    pub label: u8,
    pub message: String,
    pub timestamp_ms: u64,
}

/// In-memory latest-result store keyed by session id
pub struct Repository {
    latest: Mutex<HashMap<String, PredictionRecord>>,
    /// Max tracked sessions
    max_sessions: usize,
}

impl Repository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        Self::with_capacity(10_000)
    }

    /// Create a repository tracking at most `max_sessions` sessions
    pub fn with_capacity(max_sessions: usize) -> Self {
        info!("Creating in-memory prediction store (max {} sessions)", max_sessions);
        Self {
            latest: Mutex::new(HashMap::new()),
            max_sessions: max_sessions.max(1),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, PredictionRecord>>, StorageError> {
        self.latest
            .lock()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))
    }

    /// Record a session's result, replacing any earlier one
    pub fn upsert_latest(&self, record: PredictionRecord) -> Result<(), StorageError> {
        let mut latest = self.lock()?;

        // Evict the stalest session when full
        if latest.len() >= self.max_sessions && !latest.contains_key(&record.session_id) {
            if let Some(oldest) = latest
                .values()
                .min_by_key(|r| r.timestamp_ms)
                .map(|r| r.session_id.clone())
            {
                debug!("Evicting session {}", oldest);
                latest.remove(&oldest);
            }
        }

        debug!("Recorded label {} for session {}", record.label, record.session_id);
        latest.insert(record.session_id.clone(), record);
        Ok(())
    }

    /// Most recent result for a session
    pub fn get_latest(&self, session_id: &str) -> Result<PredictionRecord, StorageError> {
        self.lock()?
            .get(session_id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(session_id.to_string()))
    }

    /// Forget a session's result. Returns whether one existed.
    pub fn clear_session(&self, session_id: &str) -> Result<bool, StorageError> {
        Ok(self.lock()?.remove(session_id).is_some())
    }

    /// Number of sessions with a stored result
    pub fn session_count(&self) -> Result<usize, StorageError> {
        Ok(self.lock()?.len())
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}
