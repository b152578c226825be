//! Diagnosis sessions.
//!
//! A session wraps the matching engine in an explicit state machine for one patient
//! interaction:
//!
//! ```text
//!            toggle (non-empty)            analyze              save (ok)
//!   Idle  ───────────────────────▶ SymptomsSelected ─────────▶ Analyzed ─────────▶ Saved
//!     ▲  ◀─────────────────────────       ▲   │                   │
//!     │      toggle (empty)               │   └── toggle ─────────┘ (result discarded)
//!     └──────────── clear ────────────────┘
//! ```
//!
//! - `analyze` from `Idle` fails with an empty-selection error
//! - `save` without a result fails; a failed save leaves the session `Analyzed`
//! - only one save may be outstanding at a time
//! - `Saved` is terminal; `close` consumes the session from any state
//!
//! ## Example
//!
//! ```rust,no_run
//! use symptom_dx::{DiagnosisSession, DiseaseCatalog, PatientId};
//! use symptom_dx::persist::MemorySink;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = DiseaseCatalog::load_embedded()?;
//! let mut session = DiagnosisSession::new(PatientId(42), &catalog);
//!
//! session.toggle_symptom("fever")?;
//! session.toggle_symptom("cough")?;
//! println!("Suggested: {}", session.analyze()?.name());
//!
//! let sink = MemorySink::new();
//! session.save(&sink).await?;
//! # Ok(())
//! # }
//! ```

pub mod machine;

pub use machine::{DiagnosisSession, SessionError, SessionState};
