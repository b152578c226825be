use serde::Serialize;

use crate::catalog::store::DiseaseCatalog;
use crate::core::disease::DiseaseRecord;
use crate::core::selection::SelectionSet;
use crate::core::types::MatchKind;
use crate::matching::scoring::DiseaseScore;
use crate::utils::validation::ValidationError;

/// Suggestion produced by one analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// Whether the suggestion is a catalog disease or the fallback
    pub kind: MatchKind,

    /// The suggested disease; the fallback record when nothing matched
    pub disease: DiseaseRecord,

    /// Number of selected symptoms the disease lists; 0 for the fallback
    pub match_count: usize,
}

impl MatchResult {
    #[must_use]
    pub fn matched(disease: &DiseaseRecord, match_count: usize) -> Self {
        Self {
            kind: MatchKind::Matched,
            disease: disease.clone(),
            match_count,
        }
    }

    /// Fallback returned when no catalog disease overlaps the selection
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            kind: MatchKind::Unknown,
            disease: DiseaseRecord::unknown(),
            match_count: 0,
        }
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.kind == MatchKind::Unknown
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.disease.name
    }

    #[must_use]
    pub fn treatment(&self) -> &[String] {
        &self.disease.treatment
    }
}

/// A catalog disease with its score for a selection
#[derive(Debug, Clone, Serialize)]
pub struct RankedDisease<'a> {
    /// Position in the catalog; the tie-break key
    pub catalog_index: usize,
    pub disease: &'a DiseaseRecord,
    pub score: DiseaseScore,
}

/// Default minimum number of shared symptoms for a disease to be suggested
pub const DEFAULT_MIN_MATCH_COUNT: usize = 1;

/// Configuration for the matching engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchingConfig {
    /// Diseases sharing fewer selected symptoms are discarded. Values below 1 are
    /// treated as 1: a disease with no shared symptom is never suggested.
    pub min_match_count: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            min_match_count: DEFAULT_MIN_MATCH_COUNT,
        }
    }
}

impl MatchingConfig {
    fn effective_min_match_count(&self) -> usize {
        self.min_match_count.max(1)
    }
}

/// The main matching engine.
///
/// Holds only a shared borrow of the catalog and its configuration, so one engine (or
/// many) can serve any number of concurrent callers.
#[derive(Debug, Clone)]
pub struct MatchingEngine<'a> {
    catalog: &'a DiseaseCatalog,
    config: MatchingConfig,
}

impl<'a> MatchingEngine<'a> {
    /// Create a new matching engine with default configuration
    #[must_use]
    pub fn new(catalog: &'a DiseaseCatalog) -> Self {
        Self {
            catalog,
            config: MatchingConfig::default(),
        }
    }

    /// Create a new matching engine with custom configuration
    #[must_use]
    pub fn with_config(catalog: &'a DiseaseCatalog, config: MatchingConfig) -> Self {
        Self { catalog, config }
    }

    #[must_use]
    pub fn catalog(&self) -> &'a DiseaseCatalog {
        self.catalog
    }

    #[must_use]
    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Rank catalog diseases sharing symptoms with the selection.
    ///
    /// Diseases are ordered by match count, highest first. Equal counts keep catalog
    /// order. At most `limit` entries are returned.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptySelection` if no symptom is selected.
    pub fn rank(
        &self,
        selection: &SelectionSet,
        limit: usize,
    ) -> Result<Vec<RankedDisease<'a>>, ValidationError> {
        if selection.is_empty() {
            return Err(ValidationError::EmptySelection);
        }

        let min_match_count = self.config.effective_min_match_count();

        let mut ranked: Vec<RankedDisease<'a>> = self
            .catalog
            .records()
            .iter()
            .enumerate()
            .map(|(catalog_index, disease)| RankedDisease {
                catalog_index,
                disease,
                score: DiseaseScore::calculate(selection, disease),
            })
            .filter(|r| r.score.match_count >= min_match_count)
            .collect();

        // sort_by is stable: equal counts stay in catalog order
        ranked.sort_by(|a, b| b.score.match_count.cmp(&a.score.match_count));
        ranked.truncate(limit);

        tracing::debug!(
            selected = selection.len(),
            candidates = ranked.len(),
            "Ranked catalog diseases"
        );

        Ok(ranked)
    }

    /// Suggest the best matching disease, or the fallback when none overlaps.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptySelection` if no symptom is selected.
    pub fn analyze(&self, selection: &SelectionSet) -> Result<MatchResult, ValidationError> {
        let result = self
            .rank(selection, 1)?
            .first()
            .map_or_else(MatchResult::unknown, |best| {
                MatchResult::matched(best.disease, best.score.match_count)
            });

        tracing::debug!(
            disease = %result.name(),
            match_count = result.match_count,
            "Analyzed selection"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Symptom;

    fn two_disease_catalog() -> DiseaseCatalog {
        DiseaseCatalog::from_records(vec![
            DiseaseRecord::new("Flu")
                .with_symptoms(["fever", "fatigue", "cough"])
                .with_treatment(["rest", "paracetamol", "hydration"]),
            DiseaseRecord::new("COVID-19")
                .with_symptoms(["pain", "fatigue", "cough"])
                .with_treatment(["rest", "paracetamol", "hydration"]),
        ])
        .unwrap()
    }

    fn select(symptoms: &[&str]) -> SelectionSet {
        symptoms.iter().copied().collect()
    }

    #[test]
    fn test_tie_goes_to_earlier_catalog_entry() {
        let catalog = two_disease_catalog();
        let engine = MatchingEngine::new(&catalog);

        let result = engine.analyze(&select(&["fatigue", "cough"])).unwrap();
        assert_eq!(result.name(), "Flu");
        assert_eq!(result.match_count, 2);
        assert_eq!(result.kind, MatchKind::Matched);
    }

    #[test]
    fn test_tie_break_follows_catalog_order_not_name() {
        let catalog = DiseaseCatalog::from_records(vec![
            DiseaseRecord::new("Zeta").with_symptoms(["a", "b"]),
            DiseaseRecord::new("Alpha").with_symptoms(["a", "b"]),
        ])
        .unwrap();
        let engine = MatchingEngine::new(&catalog);

        for _ in 0..10 {
            assert_eq!(engine.analyze(&select(&["a", "b"])).unwrap().name(), "Zeta");
        }
    }

    #[test]
    fn test_single_symptom_selects_only_containing_disease() {
        let catalog = two_disease_catalog();
        let engine = MatchingEngine::new(&catalog);

        let result = engine.analyze(&select(&["fever"])).unwrap();
        assert_eq!(result.name(), "Flu");
        assert_eq!(result.match_count, 1);
    }

    #[test]
    fn test_higher_count_beats_catalog_order() {
        let catalog = two_disease_catalog();
        let engine = MatchingEngine::new(&catalog);

        let result = engine.analyze(&select(&["pain", "cough"])).unwrap();
        assert_eq!(result.name(), "COVID-19");
        assert_eq!(result.match_count, 2);
    }

    #[test]
    fn test_no_overlap_returns_unknown() {
        let catalog = two_disease_catalog();
        let engine = MatchingEngine::new(&catalog);

        let result = engine.analyze(&select(&["headache"])).unwrap();
        assert!(result.is_unknown());
        assert_eq!(result.name(), "Unknown");
        assert!(result.disease.symptoms.is_empty());
        assert_eq!(result.treatment(), ["consult a physician".to_string()]);
        assert_eq!(result, MatchResult::unknown());
    }

    #[test]
    fn test_empty_selection_is_rejected() {
        let catalog = two_disease_catalog();
        let engine = MatchingEngine::new(&catalog);

        assert_eq!(
            engine.analyze(&SelectionSet::new()),
            Err(ValidationError::EmptySelection)
        );
        assert!(engine.rank(&SelectionSet::new(), 5).is_err());
    }

    #[test]
    fn test_empty_catalog_always_unknown() {
        let catalog = DiseaseCatalog::new();
        let engine = MatchingEngine::new(&catalog);

        assert!(engine.analyze(&select(&["fever"])).unwrap().is_unknown());
    }

    #[test]
    fn test_repeated_analysis_is_value_equal() {
        let catalog = DiseaseCatalog::load_embedded().unwrap();
        let engine = MatchingEngine::new(&catalog);
        let selection = select(&["fever", "nausea", "cough"]);

        let first = engine.analyze(&selection).unwrap();
        for _ in 0..5 {
            assert_eq!(engine.analyze(&selection).unwrap(), first);
        }
    }

    #[test]
    fn test_selection_outside_vocabulary_is_harmless() {
        let catalog = two_disease_catalog();
        let engine = MatchingEngine::new(&catalog);

        let result = engine.analyze(&select(&["rash", "cough"])).unwrap();
        assert_eq!(result.name(), "Flu");
        assert_eq!(result.match_count, 1);
    }

    #[test]
    fn test_rank_orders_and_limits() {
        let catalog = DiseaseCatalog::load_embedded().unwrap();
        let engine = MatchingEngine::new(&catalog);
        let selection = select(&["fever", "nausea", "headache", "cough"]);

        let ranked = engine.rank(&selection, 10).unwrap();
        let names: Vec<&str> = ranked.iter().map(|r| r.disease.name.as_str()).collect();
        assert_eq!(names, vec!["Type 2 diabetes", "Flu", "COVID-19"]);
        assert_eq!(ranked[0].score.match_count, 3);
        assert_eq!(ranked[1].catalog_index, 0);

        assert_eq!(engine.rank(&selection, 1).unwrap().len(), 1);
    }

    #[test]
    fn test_min_match_count_threshold() {
        let catalog = two_disease_catalog();
        let engine = MatchingEngine::with_config(&catalog, MatchingConfig { min_match_count: 2 });

        assert!(engine.analyze(&select(&["fever"])).unwrap().is_unknown());
        assert_eq!(
            engine.analyze(&select(&["fever", "cough"])).unwrap().name(),
            "Flu"
        );
    }

    #[test]
    fn test_zero_min_match_count_still_discards_non_overlapping() {
        let catalog = two_disease_catalog();
        let engine = MatchingEngine::with_config(&catalog, MatchingConfig { min_match_count: 0 });

        let ranked = engine.rank(&select(&["pain"]), 10).unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].disease.name, "COVID-19");
    }

    #[test]
    fn test_engine_shared_across_threads() {
        let catalog = DiseaseCatalog::load_embedded().unwrap();
        let engine = MatchingEngine::new(&catalog);
        let selection = select(&["fatigue", "cough"]);
        let expected = engine.analyze(&selection).unwrap();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| engine.analyze(&selection).unwrap()))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }

    #[test]
    fn test_symptoms_are_case_sensitive() {
        let catalog = two_disease_catalog();
        let engine = MatchingEngine::new(&catalog);

        let mut selection = SelectionSet::new();
        selection.toggle(Symptom::from("Fever"));
        assert!(engine.analyze(&selection).unwrap().is_unknown());
    }
}
