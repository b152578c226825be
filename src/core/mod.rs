//! Core data types for symptom-based diagnosis suggestions.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`Symptom`]: An identifier drawn from the catalog vocabulary
//! - [`DiseaseRecord`]: A catalog entry with its symptom set and treatment lines
//! - [`SelectionSet`]: The symptoms a caller has selected in one session
//! - [`PatientId`], [`MatchKind`]: Identifiers and result classification types
//!
//! ## Symptom Identity
//!
//! Symptoms are compared by **exact string equality**. `"fever"`, `"Fever"` and
//! `"fièvre"` are three different symptoms; a catalog and its callers must agree on
//! one spelling through the catalog vocabulary.
//!
//! [`Symptom`]: types::Symptom
//! [`DiseaseRecord`]: disease::DiseaseRecord
//! [`SelectionSet`]: selection::SelectionSet
//! [`PatientId`]: types::PatientId
//! [`MatchKind`]: types::MatchKind

pub mod disease;
pub mod selection;
pub mod types;
