//! Persistence of saved diagnoses.
//!
//! A [`DiagnosisSession`](crate::session::DiagnosisSession) hands its result to a
//! [`PersistenceSink`] when the caller saves. The sink may suspend (file or network
//! I/O); failures come back as [`PersistenceError`] and never alter the session result.
//!
//! Implementations:
//!
//! - [`MemorySink`]: keeps records in memory (tests, dry runs)
//! - [`JsonlSink`](file::JsonlSink): appends one JSON object per diagnosis to a file
//! - [`HttpSink`](http::HttpSink): posts to the clinic backend's diagnostics resource

use std::future::Future;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{PatientId, Symptom};

pub mod file;
pub mod http;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server responded with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to write diagnosis: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize diagnosis: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Diagnosis rejected: {0}")]
    Rejected(String),
}

/// A diagnosis as handed to a persistence sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisRecord {
    pub patient_id: PatientId,

    /// Selected symptoms, in the order they were entered
    pub symptoms: Vec<Symptom>,

    /// Name of the suggested disease ("Unknown" for the fallback)
    pub disease: String,

    pub treatment: Vec<String>,

    pub recorded_at: DateTime<Utc>,
}

/// Destination for saved diagnoses
pub trait PersistenceSink {
    /// Persist one diagnosis
    fn persist(
        &self,
        record: &DiagnosisRecord,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send;
}

/// In-memory sink, optionally configured to reject every record
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<DiagnosisRecord>>,
    reject_with: Option<String>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every call fails with `PersistenceError::Rejected`
    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            reject_with: Some(reason.into()),
        }
    }

    /// Records persisted so far
    #[must_use]
    pub fn records(&self) -> Vec<DiagnosisRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().map(|records| records.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PersistenceSink for MemorySink {
    async fn persist(&self, record: &DiagnosisRecord) -> Result<(), PersistenceError> {
        if let Some(reason) = &self.reject_with {
            return Err(PersistenceError::Rejected(reason.clone()));
        }

        self.records
            .lock()
            .map_err(|_| PersistenceError::Rejected("memory sink poisoned".to_string()))?
            .push(record.clone());
        Ok(())
    }
}
