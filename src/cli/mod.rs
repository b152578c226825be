//! Command-line interface for symptom-dx.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **diagnose**: Suggest a disease from observed symptoms, optionally saving it
//! - **symptoms**: List the symptom vocabulary
//! - **catalog**: List, show, export, or validate disease catalogs
//! - **serve**: Start the JSON HTTP API
//!
//! ## Usage
//!
//! ```text
//! # Suggest a diagnosis
//! symptom-dx diagnose -s fatigue -s cough
//!
//! # JSON output, top 3 candidates
//! symptom-dx diagnose -s fever -s nausea -n 3 --format json
//!
//! # Save the suggestion for patient 12 to the clinic backend
//! symptom-dx diagnose -s fever --patient-id 12 --api-url http://localhost:5000
//!
//! # Start the HTTP API
//! symptom-dx serve --port 8080
//! ```

use clap::{Parser, Subcommand};

pub mod catalog;
pub mod diagnose;

#[derive(Parser)]
#[command(name = "symptom-dx")]
#[command(version)]
#[command(about = "Suggest a diagnosis from observed symptoms")]
#[command(
    long_about = "symptom-dx ranks a catalog of diseases by how many of the observed symptoms each one lists.\n\nIt provides:\n- The best matching disease and its treatment lines\n- A ranked list of other candidates\n- An 'Unknown' suggestion to consult a physician when nothing matches"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Suggest a diagnosis from observed symptoms
    Diagnose(diagnose::DiagnoseArgs),

    /// List the symptom vocabulary
    Symptoms(catalog::SymptomsArgs),

    /// Inspect disease catalogs
    Catalog(catalog::CatalogArgs),

    /// Start the web server
    Serve(ServeArgs),
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    /// Path to custom catalog file
    #[arg(long)]
    pub catalog: Option<std::path::PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Load a custom catalog if a path is given, the embedded one otherwise
///
/// # Errors
///
/// Returns an error if the catalog cannot be read or fails validation.
pub fn load_catalog(
    path: Option<&std::path::Path>,
) -> Result<crate::catalog::store::DiseaseCatalog, crate::catalog::store::CatalogError> {
    match path {
        Some(path) => crate::catalog::store::DiseaseCatalog::load_from_file(path),
        None => crate::catalog::store::DiseaseCatalog::load_embedded(),
    }
}
