//! Input validation for symptom identifiers and the caller-facing validation errors.
//!
//! Symptoms arrive from command-line arguments and HTTP bodies. They are checked here
//! before they reach the session or the matching engine, so downstream code can
//! treat a [`Symptom`] as well-formed.

use thiserror::Error;

use crate::core::selection::SelectionSet;
use crate::core::types::Symptom;

/// Maximum length in bytes of a symptom identifier
pub const MAX_SYMPTOM_LENGTH: usize = 64;

/// Maximum number of symptoms accepted in a single request
pub const MAX_SELECTION_SIZE: usize = 256;

/// Caller errors that are recovered locally by re-prompting
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("at least one symptom must be selected")]
    EmptySelection,
    #[error("symptoms must be analyzed before saving")]
    NotAnalyzed,
    #[error("a save is already in progress")]
    SaveInProgress,
    #[error("no save is in progress")]
    NoSaveInProgress,
    #[error("diagnosis has already been saved")]
    AlreadySaved,
    #[error("unknown symptom: {0}")]
    UnknownSymptom(String),
    #[error("invalid symptom identifier: {0}")]
    InvalidSymptom(String),
    #[error("too many symptoms: at most {MAX_SELECTION_SIZE} may be selected")]
    TooManySymptoms,
}

/// Validate a raw symptom identifier.
///
/// The value is not trimmed or case-folded; symptom identity is exact.
///
/// # Examples
///
/// ```
/// use symptom_dx::utils::validation::validate_symptom;
///
/// assert!(validate_symptom("fever").is_ok());
/// assert!(validate_symptom("").is_err());
/// assert!(validate_symptom("fever\n").is_err());
/// ```
///
/// # Errors
///
/// Returns `ValidationError::InvalidSymptom` if the value is empty or blank, longer than
/// [`MAX_SYMPTOM_LENGTH`], or contains control characters.
pub fn validate_symptom(raw: &str) -> Result<Symptom, ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::InvalidSymptom("empty value".to_string()));
    }

    if raw.len() > MAX_SYMPTOM_LENGTH {
        return Err(ValidationError::InvalidSymptom(format!(
            "exceeds {MAX_SYMPTOM_LENGTH} bytes"
        )));
    }

    if raw.chars().any(char::is_control) {
        return Err(ValidationError::InvalidSymptom(
            "contains control characters".to_string(),
        ));
    }

    Ok(Symptom::new(raw))
}

/// Validate a list of raw symptoms into a selection.
///
/// Repeated symptoms collapse into one, as a selection is a set.
///
/// # Errors
///
/// Returns the first invalid symptom error, or `ValidationError::TooManySymptoms` if
/// more than [`MAX_SELECTION_SIZE`] values are supplied.
pub fn validate_selection<S: AsRef<str>>(raw: &[S]) -> Result<SelectionSet, ValidationError> {
    if raw.len() > MAX_SELECTION_SIZE {
        return Err(ValidationError::TooManySymptoms);
    }

    let mut selection = SelectionSet::new();
    for value in raw {
        selection.insert(validate_symptom(value.as_ref())?);
    }
    Ok(selection)
}
