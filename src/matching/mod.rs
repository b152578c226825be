//! Symptom matching engine and scoring.
//!
//! This module provides the core matching functionality:
//!
//! - [`MatchingEngine`]: Main entry point for ranking diseases and suggesting one
//! - [`MatchResult`]: The single suggestion produced by an analysis
//! - [`DiseaseScore`]: Overlap between a selection and one disease
//!
//! ## Matching Algorithm
//!
//! 1. **Precondition**: the selection must contain at least one symptom
//! 2. **Scoring**: each disease scores the number of its symptoms that are selected
//! 3. **Filtering**: diseases sharing no selected symptom are discarded
//! 4. **Ranking**: highest score first; equal scores keep catalog order (stable sort)
//! 5. **Fallback**: when nothing remains, the suggestion is `Unknown` with the single
//!    treatment line "consult a physician"
//!
//! The engine keeps no state between calls. Equal inputs always produce equal results.
//!
//! ## Example
//!
//! ```rust,no_run
//! use symptom_dx::{DiseaseCatalog, MatchingEngine, SelectionSet};
//!
//! let catalog = DiseaseCatalog::load_embedded().unwrap();
//! let selection: SelectionSet = ["fatigue", "cough"].into_iter().collect();
//!
//! let engine = MatchingEngine::new(&catalog);
//! let suggestion = engine.analyze(&selection).unwrap();
//!
//! println!("{} ({} shared symptoms)", suggestion.name(), suggestion.match_count);
//! println!("Treatment: {}", suggestion.treatment().join(", "));
//! ```
//!
//! [`MatchingEngine`]: engine::MatchingEngine
//! [`MatchResult`]: engine::MatchResult
//! [`DiseaseScore`]: scoring::DiseaseScore

pub mod engine;
pub mod scoring;
