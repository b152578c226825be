//! Disease catalog storage.
//!
//! The catalog holds the diseases the matching engine can suggest. Each one has its
//! symptom set and treatment lines. A default catalog is compiled into the binary
//! (and validated by `build.rs`); custom catalogs can be loaded from JSON files.
//!
//! ## Embedded Catalog
//!
//! | Disease         | Symptoms                 | Treatment                     |
//! |-----------------|--------------------------|-------------------------------|
//! | Flu             | fever, fatigue, cough    | rest, paracetamol, hydration  |
//! | COVID-19        | pain, fatigue, cough     | rest, paracetamol, hydration  |
//! | Type 2 diabetes | fever, nausea, headache  | metformin                     |
//!
//! ## Example
//!
//! ```rust,no_run
//! use symptom_dx::DiseaseCatalog;
//!
//! let catalog = DiseaseCatalog::load_embedded().unwrap();
//!
//! for record in catalog.records() {
//!     println!("{}: {} symptoms", record.name, record.symptoms.len());
//! }
//!
//! let flu = catalog.get("Flu");
//! ```
//!
//! ## Custom Catalogs
//!
//! ```rust,no_run
//! use symptom_dx::DiseaseCatalog;
//! use std::path::Path;
//!
//! let json = DiseaseCatalog::load_embedded().unwrap().to_json().unwrap();
//! let custom = DiseaseCatalog::load_from_file(Path::new("my_catalog.json")).unwrap();
//! ```

pub mod store;
