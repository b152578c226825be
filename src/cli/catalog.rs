use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::catalog::store::DiseaseCatalog;
use crate::cli::{load_catalog, OutputFormat};

#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommands,
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List all diseases in the catalog
    List {
        /// Path to custom catalog file
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Only list diseases with this symptom
        #[arg(long)]
        symptom: Option<String>,
    },

    /// Show details of a specific disease
    Show {
        /// Disease name (exact)
        #[arg(required = true)]
        name: String,

        /// Path to custom catalog file
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Export the catalog to a file
    Export {
        /// Output file path
        #[arg(required = true)]
        output: PathBuf,

        /// Path to custom catalog file to export (defaults to embedded)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Check that a catalog file is well-formed
    Validate {
        /// Catalog file to check
        #[arg(required = true)]
        path: PathBuf,
    },
}

#[derive(Args)]
pub struct SymptomsArgs {
    /// Path to custom catalog file
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

/// Execute catalog subcommand
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded, the disease is not found, or the
/// export cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: CatalogArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    match args.command {
        CatalogCommands::List { catalog, symptom } => {
            run_list(catalog, symptom.as_deref(), format, verbose)
        }
        CatalogCommands::Show { name, catalog } => run_show(&name, catalog, format),
        CatalogCommands::Export { output, catalog } => run_export(output, catalog),
        CatalogCommands::Validate { path } => run_validate(path, format),
    }
}

/// Execute symptoms subcommand
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run_symptoms(args: SymptomsArgs, format: OutputFormat) -> anyhow::Result<()> {
    let catalog = load_catalog(args.catalog.as_deref())?;

    match format {
        OutputFormat::Text => {
            println!("Symptoms ({})\n", catalog.vocabulary().len());
            for symptom in catalog.vocabulary() {
                let diseases = diseases_with(&catalog, symptom.as_str());
                println!("  {symptom:<20} {}", diseases.join(", "));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(catalog.vocabulary())?);
        }
        OutputFormat::Tsv => {
            println!("symptom\tdiseases");
            for symptom in catalog.vocabulary() {
                println!(
                    "{symptom}\t{}",
                    diseases_with(&catalog, symptom.as_str()).join(";")
                );
            }
        }
    }

    Ok(())
}

fn diseases_with<'c>(catalog: &'c DiseaseCatalog, symptom: &str) -> Vec<&'c str> {
    catalog
        .records()
        .iter()
        .filter(|r| r.symptoms.iter().any(|s| s.as_str() == symptom))
        .map(|r| r.name.as_str())
        .collect()
}

fn run_list(
    catalog_path: Option<PathBuf>,
    symptom_filter: Option<&str>,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog_path.as_deref())?;

    if verbose {
        eprintln!("Loaded catalog with {} diseases", catalog.len());
    }

    let filtered: Vec<_> = catalog
        .records()
        .iter()
        .filter(|r| symptom_filter.map_or(true, |s| r.symptoms.iter().any(|rs| rs.as_str() == s)))
        .collect();

    match format {
        OutputFormat::Text => {
            let name_width = filtered
                .iter()
                .map(|r| r.name.len())
                .max()
                .unwrap_or(4)
                .max(4);

            println!("Disease Catalog ({} diseases)\n", filtered.len());
            println!("{:<name_w$}  Symptoms", "Name", name_w = name_width);
            println!("{}", "-".repeat(name_width + 40));
            for record in &filtered {
                let symptoms: Vec<&str> = record.symptoms.iter().map(|s| s.as_str()).collect();
                println!(
                    "{:<name_w$}  {}",
                    record.name,
                    symptoms.join(", "),
                    name_w = name_width
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&filtered)?);
        }
        OutputFormat::Tsv => {
            println!("name\tsymptoms\ttreatment");
            for record in &filtered {
                let symptoms: Vec<&str> = record.symptoms.iter().map(|s| s.as_str()).collect();
                println!(
                    "{}\t{}\t{}",
                    record.name,
                    symptoms.join(";"),
                    record.treatment.join(";")
                );
            }
        }
    }

    Ok(())
}

fn run_show(name: &str, catalog_path: Option<PathBuf>, format: OutputFormat) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog_path.as_deref())?;

    let record = catalog
        .get(name)
        .ok_or_else(|| anyhow::anyhow!("Disease '{}' not found", name))?;

    match format {
        OutputFormat::Text => {
            println!("Disease: {}\n", record.name);
            println!("Symptoms:");
            for symptom in &record.symptoms {
                println!("  - {symptom}");
            }
            println!("\nTreatment:");
            if record.treatment.is_empty() {
                println!("  (none listed)");
            }
            for (i, line) in record.treatment.iter().enumerate() {
                println!("  {}. {line}", i + 1);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(record)?);
        }
        OutputFormat::Tsv => {
            println!("field\tvalue");
            println!("name\t{}", record.name);
            for symptom in &record.symptoms {
                println!("symptom\t{symptom}");
            }
            for line in &record.treatment {
                println!("treatment\t{line}");
            }
        }
    }

    Ok(())
}

fn run_export(output: PathBuf, catalog_path: Option<PathBuf>) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog_path.as_deref())?;

    let json = catalog.to_json()?;
    std::fs::write(&output, json)?;

    println!(
        "Exported {} diseases to {}",
        catalog.len(),
        output.display()
    );

    Ok(())
}

fn run_validate(path: PathBuf, format: OutputFormat) -> anyhow::Result<()> {
    let catalog = DiseaseCatalog::load_from_file(&path)?;

    match format {
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "path": path.display().to_string(),
                "valid": true,
                "diseases": catalog.len(),
                "symptoms": catalog.vocabulary().len(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Text | OutputFormat::Tsv => {
            println!(
                "{}: OK ({} diseases, {} symptoms)",
                path.display(),
                catalog.len(),
                catalog.vocabulary().len()
            );
        }
    }

    Ok(())
}
