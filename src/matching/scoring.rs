use serde::Serialize;

use crate::core::disease::DiseaseRecord;
use crate::core::selection::SelectionSet;

/// Convert a symptom count to f64 for ratio calculations.
///
/// Counts here are bounded by catalog and selection sizes, far below f64's exact
/// integer range.
#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Overlap between a selection and one disease
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiseaseScore {
    /// |disease symptoms ∩ selection|; the only value used for ranking
    pub match_count: usize,

    /// Fraction of the selection explained by the disease
    pub selection_coverage: f64,

    /// Fraction of the disease's symptoms present in the selection
    pub disease_coverage: f64,
}

impl DiseaseScore {
    /// Score a disease against a selection.
    ///
    /// Catalog records carry no repeated symptoms, so counting the disease's symptoms
    /// found in the selection is the intersection cardinality.
    #[must_use]
    pub fn calculate(selection: &SelectionSet, disease: &DiseaseRecord) -> Self {
        let match_count = match_count(selection, disease);

        let selection_coverage = if selection.is_empty() {
            0.0
        } else {
            count_to_f64(match_count) / count_to_f64(selection.len())
        };

        let disease_coverage = if disease.symptoms.is_empty() {
            0.0
        } else {
            count_to_f64(match_count) / count_to_f64(disease.symptoms.len())
        };

        Self {
            match_count,
            selection_coverage,
            disease_coverage,
        }
    }

    /// The score reported for the fallback suggestion
    #[must_use]
    pub fn none() -> Self {
        Self {
            match_count: 0,
            selection_coverage: 0.0,
            disease_coverage: 0.0,
        }
    }
}

/// Number of the disease's symptoms present in the selection
#[must_use]
pub fn match_count(selection: &SelectionSet, disease: &DiseaseRecord) -> usize {
    disease
        .symptoms
        .iter()
        .filter(|s| selection.contains(s))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flu() -> DiseaseRecord {
        DiseaseRecord::new("Flu").with_symptoms(["fever", "fatigue", "cough"])
    }

    #[test]
    fn test_match_count_is_intersection_size() {
        let selection: SelectionSet = ["fatigue", "cough", "headache"].into_iter().collect();
        assert_eq!(match_count(&selection, &flu()), 2);
    }

    #[test]
    fn test_no_overlap() {
        let selection: SelectionSet = ["nausea"].into_iter().collect();
        let score = DiseaseScore::calculate(&selection, &flu());
        assert_eq!(score.match_count, 0);
        assert!(score.selection_coverage.abs() < f64::EPSILON);
        assert!(score.disease_coverage.abs() < f64::EPSILON);
    }

    #[test]
    fn test_coverage_ratios() {
        let selection: SelectionSet = ["fever", "nausea"].into_iter().collect();
        let score = DiseaseScore::calculate(&selection, &flu());

        assert_eq!(score.match_count, 1);
        assert!((score.selection_coverage - 0.5).abs() < 1e-9);
        assert!((score.disease_coverage - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_selection_scores_zero() {
        let score = DiseaseScore::calculate(&SelectionSet::new(), &flu());
        assert_eq!(score, DiseaseScore::none());
    }
}
