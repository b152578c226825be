use serde::{Deserialize, Serialize};

use crate::core::types::Symptom;

/// Display name of the fallback suggestion
pub const UNKNOWN_DISEASE_NAME: &str = "Unknown";

/// Single treatment line of the fallback suggestion
pub const UNKNOWN_TREATMENT: &str = "consult a physician";

/// A disease in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseRecord {
    /// Display name, unique within a catalog
    pub name: String,

    /// Associated symptoms, in declaration order
    pub symptoms: Vec<Symptom>,

    /// Treatment recommendations, in display order
    #[serde(default)]
    pub treatment: Vec<String>,
}

impl DiseaseRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symptoms: Vec::new(),
            treatment: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_symptoms<I, S>(mut self, symptoms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symptom>,
    {
        self.symptoms = symptoms.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_treatment<I, S>(mut self, treatment: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.treatment = treatment.into_iter().map(Into::into).collect();
        self
    }

    /// The fallback record: no symptoms and a single "consult a physician" line
    #[must_use]
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_DISEASE_NAME).with_treatment([UNKNOWN_TREATMENT])
    }

    #[must_use]
    pub fn has_symptom(&self, symptom: &Symptom) -> bool {
        self.symptoms.contains(symptom)
    }

    /// Remove repeated symptoms, keeping the first occurrence.
    /// Returns the symptoms that were dropped.
    pub fn dedup_symptoms(&mut self) -> Vec<Symptom> {
        let mut kept: Vec<Symptom> = Vec::with_capacity(self.symptoms.len());
        let mut dropped = Vec::new();
        for symptom in self.symptoms.drain(..) {
            if kept.contains(&symptom) {
                dropped.push(symptom);
            } else {
                kept.push(symptom);
            }
        }
        self.symptoms = kept;
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_record() {
        let unknown = DiseaseRecord::unknown();
        assert_eq!(unknown.name, "Unknown");
        assert!(unknown.symptoms.is_empty());
        assert_eq!(unknown.treatment, vec!["consult a physician".to_string()]);
    }

    #[test]
    fn test_dedup_symptoms_keeps_first_occurrence() {
        let mut record =
            DiseaseRecord::new("Flu").with_symptoms(["fever", "cough", "fever", "fatigue", "cough"]);

        let dropped = record.dedup_symptoms();

        assert_eq!(
            record.symptoms,
            vec![Symptom::from("fever"), Symptom::from("cough"), Symptom::from("fatigue")]
        );
        assert_eq!(dropped.len(), 2);
    }

    #[test]
    fn test_deserialize_without_treatment() {
        let record: DiseaseRecord =
            serde_json::from_str(r#"{"name": "Cold", "symptoms": ["cough"]}"#).unwrap();
        assert_eq!(record.name, "Cold");
        assert!(record.treatment.is_empty());
        assert!(record.has_symptom(&Symptom::from("cough")));
    }
}
