use serde::Serialize;
use thiserror::Error;

use crate::catalog::store::DiseaseCatalog;
use crate::core::selection::SelectionSet;
use crate::core::types::{PatientId, Symptom};
use crate::matching::engine::{MatchResult, MatchingEngine};
use crate::persist::{DiagnosisRecord, PersistenceError, PersistenceSink};
use crate::utils::validation::ValidationError;

/// Errors surfaced by a diagnosis session
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to save diagnosis: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No symptom selected, no result
    Idle,
    /// At least one symptom selected, no result for the current selection
    SymptomsSelected,
    /// A result has been computed from the current selection
    Analyzed,
    /// The result was persisted; no further transitions
    Saved,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::SymptomsSelected => write!(f, "symptoms selected"),
            Self::Analyzed => write!(f, "analyzed"),
            Self::Saved => write!(f, "saved"),
        }
    }
}

/// One diagnostic interaction for one patient.
///
/// Owned by a single caller; every transition takes `&mut self`. Closing the session
/// consumes it.
#[derive(Debug)]
pub struct DiagnosisSession<'a> {
    patient_id: PatientId,
    engine: MatchingEngine<'a>,
    state: SessionState,
    selection: SelectionSet,
    result: Option<MatchResult>,
    save_in_flight: bool,
}

impl<'a> DiagnosisSession<'a> {
    /// Start a session matching against `catalog` with the default configuration
    #[must_use]
    pub fn new(patient_id: PatientId, catalog: &'a DiseaseCatalog) -> Self {
        Self::with_engine(patient_id, MatchingEngine::new(catalog))
    }

    #[must_use]
    pub fn with_engine(patient_id: PatientId, engine: MatchingEngine<'a>) -> Self {
        tracing::debug!(patient = %patient_id, "Opened diagnosis session");
        Self {
            patient_id,
            engine,
            state: SessionState::Idle,
            selection: SelectionSet::new(),
            result: None,
            save_in_flight: false,
        }
    }

    #[must_use]
    pub fn patient_id(&self) -> PatientId {
        self.patient_id
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Result for the current selection, if analyzed
    #[must_use]
    pub fn result(&self) -> Option<&MatchResult> {
        self.result.as_ref()
    }

    /// Whether a save is outstanding
    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.save_in_flight
    }

    /// Select the symptom if unselected, unselect it otherwise.
    ///
    /// Any result computed earlier is discarded: it no longer describes the selection.
    /// Returns `true` when the symptom is selected afterwards.
    ///
    /// # Errors
    ///
    /// Returns `UnknownSymptom` for symptoms outside the catalog vocabulary,
    /// `SaveInProgress` while a save is outstanding, and `AlreadySaved` once saved.
    pub fn toggle_symptom(&mut self, symptom: impl Into<Symptom>) -> Result<bool, ValidationError> {
        self.ensure_editable()?;

        let symptom = symptom.into();
        if !self.engine.catalog().contains_symptom(&symptom) {
            return Err(ValidationError::UnknownSymptom(symptom.0));
        }

        let selected = self.selection.toggle(symptom);
        self.selection_changed();
        Ok(selected)
    }

    /// Unselect every symptom and return to `Idle`
    ///
    /// # Errors
    ///
    /// Returns `SaveInProgress` while a save is outstanding and `AlreadySaved` once saved.
    pub fn clear_selection(&mut self) -> Result<(), ValidationError> {
        self.ensure_editable()?;
        self.selection.clear();
        self.selection_changed();
        Ok(())
    }

    /// Run the matching engine on the current selection
    ///
    /// # Errors
    ///
    /// Returns `EmptySelection` in `Idle`, `SaveInProgress` while a save is outstanding,
    /// and `AlreadySaved` once saved.
    pub fn analyze(&mut self) -> Result<&MatchResult, ValidationError> {
        self.ensure_editable()?;

        match self.state {
            SessionState::Idle => Err(ValidationError::EmptySelection),
            SessionState::SymptomsSelected | SessionState::Analyzed => {
                let result = self.engine.analyze(&self.selection)?;
                self.state = SessionState::Analyzed;
                Ok(&*self.result.insert(result))
            }
            SessionState::Saved => Err(ValidationError::AlreadySaved),
        }
    }

    /// Mark a save as outstanding and build the record to persist.
    ///
    /// Use with [`Self::complete_save`] when driving the sink yourself; [`Self::save`]
    /// does both.
    ///
    /// # Errors
    ///
    /// Returns `AlreadySaved` once saved, `SaveInProgress` if a save is outstanding,
    /// and `NotAnalyzed` if there is no result.
    pub fn begin_save(&mut self) -> Result<DiagnosisRecord, ValidationError> {
        if self.state == SessionState::Saved {
            return Err(ValidationError::AlreadySaved);
        }
        if self.save_in_flight {
            return Err(ValidationError::SaveInProgress);
        }
        let Some(result) = &self.result else {
            return Err(ValidationError::NotAnalyzed);
        };

        let record = DiagnosisRecord {
            patient_id: self.patient_id,
            symptoms: self.selection.as_slice().to_vec(),
            disease: result.disease.name.clone(),
            treatment: result.disease.treatment.clone(),
            recorded_at: chrono::Utc::now(),
        };

        self.save_in_flight = true;
        Ok(record)
    }

    /// Finish an outstanding save with the sink's outcome.
    ///
    /// Success moves the session to `Saved`. Failure leaves it `Analyzed` with its
    /// result untouched so the caller can retry.
    ///
    /// # Errors
    ///
    /// Returns `NoSaveInProgress` if [`Self::begin_save`] was not called, or the sink's
    /// error as `SessionError::Persistence`.
    pub fn complete_save(
        &mut self,
        outcome: Result<(), PersistenceError>,
    ) -> Result<(), SessionError> {
        if !self.save_in_flight {
            return Err(ValidationError::NoSaveInProgress.into());
        }
        self.save_in_flight = false;

        match outcome {
            Ok(()) => {
                self.state = SessionState::Saved;
                tracing::debug!(patient = %self.patient_id, "Diagnosis saved");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(patient = %self.patient_id, error = %e, "Saving diagnosis failed");
                Err(e.into())
            }
        }
    }

    /// Persist the current result through `sink`.
    ///
    /// If the returned future is dropped before completion, the session stays
    /// `Analyzed` and may save again.
    ///
    /// # Errors
    ///
    /// Returns the validation errors of [`Self::begin_save`] without contacting the
    /// sink, or the sink's error as `SessionError::Persistence`.
    pub async fn save<S: PersistenceSink>(&mut self, sink: &S) -> Result<(), SessionError> {
        let record = self.begin_save()?;
        let guard = InFlightGuard { session: self };
        let outcome = sink.persist(&record).await;
        guard.session.complete_save(outcome)
    }

    /// End the session, returning the state it was closed in
    #[must_use]
    pub fn close(self) -> SessionState {
        tracing::debug!(patient = %self.patient_id, state = %self.state, "Closed diagnosis session");
        self.state
    }

    fn ensure_editable(&self) -> Result<(), ValidationError> {
        if self.state == SessionState::Saved {
            return Err(ValidationError::AlreadySaved);
        }
        if self.save_in_flight {
            return Err(ValidationError::SaveInProgress);
        }
        Ok(())
    }

    fn selection_changed(&mut self) {
        if self.result.take().is_some() {
            tracing::debug!(patient = %self.patient_id, "Selection changed, discarded result");
        }
        self.state = if self.selection.is_empty() {
            SessionState::Idle
        } else {
            SessionState::SymptomsSelected
        };
    }
}

/// Releases the in-flight flag if a save future is dropped mid-flight
struct InFlightGuard<'s, 'a> {
    session: &'s mut DiagnosisSession<'a>,
}

impl Drop for InFlightGuard<'_, '_> {
    fn drop(&mut self) {
        self.session.save_in_flight = false;
    }
}
