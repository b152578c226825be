use std::path::PathBuf;

use clap::Args;

use crate::cli::{load_catalog, OutputFormat};
use crate::core::selection::SelectionSet;
use crate::core::types::PatientId;
use crate::matching::engine::{
    MatchResult, MatchingConfig, MatchingEngine, RankedDisease, DEFAULT_MIN_MATCH_COUNT,
};
use crate::persist::file::JsonlSink;
use crate::persist::http::HttpSink;
use crate::persist::PersistenceSink;
use crate::session::DiagnosisSession;
use crate::utils::validation::validate_selection;

#[derive(Args)]
pub struct DiagnoseArgs {
    /// Observed symptom; repeat for several (e.g. -s fever -s cough)
    #[arg(short, long = "symptom")]
    pub symptoms: Vec<String>,

    /// Patient the diagnosis is recorded for (required when saving)
    #[arg(long)]
    pub patient_id: Option<u64>,

    /// Number of candidate diseases to show
    #[arg(short = 'n', long, default_value = "5")]
    pub max_matches: usize,

    /// Minimum number of shared symptoms for a disease to be suggested
    #[arg(long, default_value_t = DEFAULT_MIN_MATCH_COUNT)]
    pub min_matches: usize,

    /// Path to custom catalog file
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Append the saved diagnosis as a JSON line to this file
    #[arg(long, requires = "patient_id", conflicts_with = "api_url")]
    pub save_jsonl: Option<PathBuf>,

    /// Save the diagnosis to the clinic backend at this base URL
    #[arg(long, env = "SYMPTOM_DX_API_URL", requires = "patient_id")]
    pub api_url: Option<String>,

    /// Bearer token for the clinic backend
    #[arg(long, env = "SYMPTOM_DX_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,
}

/// Execute diagnose subcommand
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded, a symptom is invalid or unknown,
/// no symptom is given, or saving fails.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: DiagnoseArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let catalog = load_catalog(args.catalog.as_deref())?;

    if verbose {
        eprintln!(
            "Loaded catalog with {} diseases and {} known symptoms",
            catalog.len(),
            catalog.vocabulary().len()
        );
    }

    if catalog.is_empty() {
        eprintln!("Warning: Catalog is empty, every analysis will be 'Unknown'.");
    }

    let selection = validate_selection(&args.symptoms)?;

    let config = MatchingConfig {
        min_match_count: args.min_matches,
    };
    let engine = MatchingEngine::with_config(&catalog, config);

    let mut session = DiagnosisSession::with_engine(
        PatientId(args.patient_id.unwrap_or_default()),
        engine.clone(),
    );
    for symptom in &selection {
        session.toggle_symptom(symptom.clone())?;
    }

    let suggestion = session.analyze()?.clone();
    let ranking = engine.rank(session.selection(), args.max_matches)?;

    match format {
        OutputFormat::Text => print_text_result(&suggestion, &ranking, session.selection(), verbose),
        OutputFormat::Json => print_json_result(&suggestion, &ranking, session.selection())?,
        OutputFormat::Tsv => print_tsv_result(&suggestion, &ranking),
    }

    if let Some(path) = &args.save_jsonl {
        save(&mut session, &JsonlSink::new(path))?;
        eprintln!(
            "Saved diagnosis for patient {} to {}",
            session.patient_id(),
            path.display()
        );
    } else if let Some(api_url) = &args.api_url {
        let sink = HttpSink::new(api_url, args.api_token.clone())?;
        save(&mut session, &sink)?;
        eprintln!(
            "Saved diagnosis for patient {} to {}",
            session.patient_id(),
            sink.endpoint()
        );
    }

    let _ = session.close();
    Ok(())
}

fn save<S: PersistenceSink>(session: &mut DiagnosisSession<'_>, sink: &S) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(session.save(sink))?;
    Ok(())
}

fn print_text_result(
    suggestion: &MatchResult,
    ranking: &[RankedDisease<'_>],
    selection: &SelectionSet,
    verbose: bool,
) {
    if suggestion.is_unknown() {
        println!("Suggested diagnosis: {} (no catalog disease matches)", suggestion.name());
    } else {
        println!(
            "Suggested diagnosis: {} ({} of {} selected symptoms)",
            suggestion.name(),
            suggestion.match_count,
            selection.len()
        );
    }
    println!("Treatment: {}", suggestion.treatment().join(", "));

    if verbose {
        let selected: Vec<&str> = selection.iter().map(|s| s.as_str()).collect();
        println!("Selected symptoms: {}", selected.join(", "));
    }

    if ranking.len() > 1 {
        let name_width = ranking
            .iter()
            .map(|r| r.disease.name.len())
            .max()
            .unwrap_or(7)
            .max(7);

        println!("\nCandidates:");
        for (i, candidate) in ranking.iter().enumerate() {
            println!(
                "  #{} {:<name_w$}  {} shared  ({:.0}% of selection, {:.0}% of disease)",
                i + 1,
                candidate.disease.name,
                candidate.score.match_count,
                candidate.score.selection_coverage * 100.0,
                candidate.score.disease_coverage * 100.0,
                name_w = name_width,
            );
        }
    }
}

fn print_json_result(
    suggestion: &MatchResult,
    ranking: &[RankedDisease<'_>],
    selection: &SelectionSet,
) -> anyhow::Result<()> {
    let candidates: Vec<serde_json::Value> = ranking
        .iter()
        .enumerate()
        .map(|(i, r)| {
            serde_json::json!({
                "rank": i + 1,
                "disease": r.disease.name,
                "catalog_index": r.catalog_index,
                "match_count": r.score.match_count,
                "selection_coverage": r.score.selection_coverage,
                "disease_coverage": r.score.disease_coverage,
                "treatment": r.disease.treatment,
            })
        })
        .collect();

    let output = serde_json::json!({
        "selection": selection,
        "suggestion": suggestion,
        "candidates": candidates,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_result(suggestion: &MatchResult, ranking: &[RankedDisease<'_>]) {
    println!("rank\tdisease\tmatch_count\tselection_coverage\tdisease_coverage\ttreatment");
    if ranking.is_empty() {
        println!(
            "1\t{}\t0\t0.0000\t0.0000\t{}",
            suggestion.name(),
            suggestion.treatment().join(";")
        );
        return;
    }
    for (i, r) in ranking.iter().enumerate() {
        println!(
            "{}\t{}\t{}\t{:.4}\t{:.4}\t{}",
            i + 1,
            r.disease.name,
            r.score.match_count,
            r.score.selection_coverage,
            r.score.disease_coverage,
            r.disease.treatment.join(";"),
        );
    }
}
