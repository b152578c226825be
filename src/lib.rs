//! # symptom-dx
//!
//! A library for suggesting a diagnosis from a set of observed symptoms.
//!
//! A clinician ticks the symptoms a patient presents. `symptom-dx` compares that
//! selection against a catalog of known diseases, suggests the disease sharing the most
//! symptoms along with its treatment, and records the confirmed diagnosis for the patient.
//!
//! ## Features
//!
//! - **Overlap matching**: Diseases are ranked by how many selected symptoms they list
//! - **Stable ties**: Equal scores keep catalog order, so results are deterministic
//! - **Unknown fallback**: No overlap yields "Unknown" with advice to consult a physician
//! - **Session lifecycle**: Select, analyze, then save, with one save in flight at a time
//! - **Pluggable persistence**: In-memory, JSON-lines file, or HTTP backend sinks
//!
//! ## Example
//!
//! ```rust
//! use symptom_dx::{DiseaseCatalog, MatchingEngine, SelectionSet};
//!
//! // Load the embedded catalog of known diseases
//! let catalog = DiseaseCatalog::load_embedded().unwrap();
//!
//! let selection: SelectionSet = ["fatigue", "cough"].into_iter().collect();
//!
//! let engine = MatchingEngine::new(&catalog);
//! let result = engine.analyze(&selection).unwrap();
//!
//! assert_eq!(result.name(), "Flu");
//! println!("{}: {}", result.name(), result.treatment().join(", "));
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Disease catalog storage and validation
//! - [`core`]: Core data types for symptoms, diseases, and selections
//! - [`matching`]: Matching engine and scoring
//! - [`session`]: Diagnosis session state machine
//! - [`persist`]: Sinks that record confirmed diagnoses
//! - [`cli`]: Command-line interface implementation
//! - [`web`]: JSON HTTP API

pub mod catalog;
pub mod cli;
pub mod core;
pub mod matching;
pub mod persist;
pub mod session;
pub mod utils;
pub mod web;

// Re-export commonly used types for convenience
pub use catalog::store::{CatalogError, DiseaseCatalog};
pub use core::disease::DiseaseRecord;
pub use core::selection::SelectionSet;
pub use core::types::*;
pub use matching::engine::{MatchResult, MatchingConfig, MatchingEngine};
pub use persist::{DiagnosisRecord, PersistenceError, PersistenceSink};
pub use session::{DiagnosisSession, SessionError, SessionState};
pub use utils::validation::ValidationError;
