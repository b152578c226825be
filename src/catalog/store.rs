use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::core::disease::DiseaseRecord;
use crate::core::types::Symptom;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Disease at position {index} has an empty name")]
    EmptyName { index: usize },

    #[error("Duplicate disease name: {0}")]
    DuplicateName(String),

    #[error("Disease '{0}' has no symptoms and can never be matched")]
    EmptySymptoms(String),

    #[error("Disease '{disease}' contains an empty symptom identifier")]
    EmptySymptom { disease: String },

    #[error("Disease '{disease}' uses symptom '{symptom}' which is not in the vocabulary")]
    UnknownSymptom { disease: String, symptom: String },
}

/// Catalog version for compatibility checking
pub const CATALOG_VERSION: &str = "1.0.0";

/// Serializable catalog format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogData {
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Declared symptom vocabulary; derived from the diseases when empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vocabulary: Vec<Symptom>,

    pub diseases: Vec<DiseaseRecord>,
}

/// The fixed disease catalog.
///
/// Record order is significant: it is the tie-break order of the matching engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiseaseCatalog {
    records: Vec<DiseaseRecord>,

    vocabulary: Vec<Symptom>,

    /// Index: disease name -> position in records
    name_to_index: HashMap<String, usize>,
}

impl DiseaseCatalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            vocabulary: Vec::new(),
            name_to_index: HashMap::new(),
        }
    }

    /// Load the embedded default catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded catalog is malformed, which `build.rs` rules out.
    pub fn load_embedded() -> Result<Self, CatalogError> {
        // Validated at compile time by build.rs
        const EMBEDDED_CATALOG: &str = include_str!("../../catalogs/diseases.json");
        Self::from_json(EMBEDDED_CATALOG)
    }

    /// Load catalog from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse catalog from JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or any record fails validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(json)?;

        // Version check (warn but don't fail)
        if data.version != CATALOG_VERSION {
            tracing::warn!(
                expected = CATALOG_VERSION,
                found = %data.version,
                "Catalog version mismatch"
            );
        }

        Self::build(data.diseases, data.vocabulary)
    }

    /// Build a catalog from records, deriving the vocabulary from their symptoms
    ///
    /// # Errors
    ///
    /// Returns an error if a record has an empty name, a duplicate name, or no symptoms.
    pub fn from_records(records: Vec<DiseaseRecord>) -> Result<Self, CatalogError> {
        Self::build(records, Vec::new())
    }

    /// Build a catalog from records checked against a declared vocabulary
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_records`], plus any record symptom missing from `vocabulary`.
    pub fn with_vocabulary(
        records: Vec<DiseaseRecord>,
        vocabulary: Vec<Symptom>,
    ) -> Result<Self, CatalogError> {
        Self::build(records, vocabulary)
    }

    fn build(records: Vec<DiseaseRecord>, vocabulary: Vec<Symptom>) -> Result<Self, CatalogError> {
        let declared = !vocabulary.is_empty();
        let mut catalog = Self::new();
        for symptom in vocabulary {
            if !catalog.vocabulary.contains(&symptom) {
                catalog.vocabulary.push(symptom);
            }
        }

        for (index, mut record) in records.into_iter().enumerate() {
            validate_record(&record, index)?;

            let dropped = record.dedup_symptoms();
            if !dropped.is_empty() {
                tracing::warn!(
                    disease = %record.name,
                    duplicates = dropped.len(),
                    "Ignoring repeated symptoms in catalog record"
                );
            }

            for symptom in &record.symptoms {
                if catalog.vocabulary.contains(symptom) {
                    continue;
                }
                if declared {
                    return Err(CatalogError::UnknownSymptom {
                        disease: record.name.clone(),
                        symptom: symptom.0.clone(),
                    });
                }
                catalog.vocabulary.push(symptom.clone());
            }

            catalog.add_record(record)?;
        }

        Ok(catalog)
    }

    fn add_record(&mut self, record: DiseaseRecord) -> Result<(), CatalogError> {
        let index = self.records.len();
        if self.name_to_index.contains_key(&record.name) {
            return Err(CatalogError::DuplicateName(record.name));
        }
        self.name_to_index.insert(record.name.clone(), index);
        self.records.push(record);
        Ok(())
    }

    /// All records in catalog order
    #[must_use]
    pub fn records(&self) -> &[DiseaseRecord] {
        &self.records
    }

    /// Get a record by its exact name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DiseaseRecord> {
        self.name_to_index.get(name).map(|&idx| &self.records[idx])
    }

    /// Symptom vocabulary accepted by this catalog
    #[must_use]
    pub fn vocabulary(&self) -> &[Symptom] {
        &self.vocabulary
    }

    #[must_use]
    pub fn contains_symptom(&self, symptom: &Symptom) -> bool {
        self.vocabulary.contains(symptom)
    }

    /// Export catalog to JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, CatalogError> {
        let data = CatalogData {
            version: CATALOG_VERSION.to_string(),
            created_at: Some(chrono::Utc::now().to_rfc3339()),
            vocabulary: self.vocabulary.clone(),
            diseases: self.records.clone(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Number of records in catalog
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for DiseaseCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_record(record: &DiseaseRecord, index: usize) -> Result<(), CatalogError> {
    if record.name.trim().is_empty() {
        return Err(CatalogError::EmptyName { index });
    }
    if record.symptoms.is_empty() {
        return Err(CatalogError::EmptySymptoms(record.name.clone()));
    }
    if record.symptoms.iter().any(|s| s.0.is_empty()) {
        return Err(CatalogError::EmptySymptom {
            disease: record.name.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flu() -> DiseaseRecord {
        DiseaseRecord::new("Flu")
            .with_symptoms(["fever", "fatigue", "cough"])
            .with_treatment(["rest", "paracetamol", "hydration"])
    }

    #[test]
    fn test_load_embedded_catalog() {
        let catalog = DiseaseCatalog::load_embedded().unwrap();
        assert!(!catalog.is_empty());
        assert_eq!(catalog.records()[0].name, "Flu");
        assert_eq!(catalog.vocabulary().len(), 6);
    }

    #[test]
    fn test_embedded_catalog_is_value_equal_across_loads() {
        let first = DiseaseCatalog::load_embedded().unwrap();
        let second = DiseaseCatalog::load_embedded().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_catalog_get_by_name() {
        let catalog = DiseaseCatalog::load_embedded().unwrap();

        let covid = catalog.get("COVID-19");
        assert!(covid.is_some());
        assert!(covid.unwrap().has_symptom(&Symptom::from("pain")));
        assert!(catalog.get("covid-19").is_none());
    }

    #[test]
    fn test_records_keep_declaration_order() {
        let catalog = DiseaseCatalog::from_records(vec![
            DiseaseRecord::new("B").with_symptoms(["x"]),
            DiseaseRecord::new("A").with_symptoms(["y"]),
            DiseaseRecord::new("C").with_symptoms(["x", "z"]),
        ])
        .unwrap();

        let names: Vec<&str> = catalog.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);

        let vocabulary: Vec<&str> = catalog.vocabulary().iter().map(Symptom::as_str).collect();
        assert_eq!(vocabulary, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_rejects_record_without_symptoms() {
        let result = DiseaseCatalog::from_records(vec![flu(), DiseaseRecord::new("Nothing")]);
        assert!(matches!(result, Err(CatalogError::EmptySymptoms(name)) if name == "Nothing"));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let result = DiseaseCatalog::from_records(vec![flu(), flu()]);
        assert!(matches!(result, Err(CatalogError::DuplicateName(name)) if name == "Flu"));
    }

    #[test]
    fn test_rejects_blank_name() {
        let result =
            DiseaseCatalog::from_records(vec![DiseaseRecord::new("  ").with_symptoms(["fever"])]);
        assert!(matches!(result, Err(CatalogError::EmptyName { index: 0 })));
    }

    #[test]
    fn test_rejects_symptom_outside_declared_vocabulary() {
        let result = DiseaseCatalog::with_vocabulary(vec![flu()], vec![Symptom::from("fever")]);
        assert!(matches!(
            result,
            Err(CatalogError::UnknownSymptom { symptom, .. }) if symptom == "fatigue"
        ));
    }

    #[test]
    fn test_deduplicates_record_symptoms() {
        let catalog = DiseaseCatalog::from_records(vec![
            DiseaseRecord::new("Cold").with_symptoms(["cough", "cough", "fever"])
        ])
        .unwrap();
        assert_eq!(catalog.records()[0].symptoms.len(), 2);
    }

    #[test]
    fn test_empty_catalog_from_json() {
        let catalog = DiseaseCatalog::from_json(r#"{"version": "1.0.0", "diseases": []}"#).unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.vocabulary().is_empty());
    }

    #[test]
    fn test_catalog_to_json_round_trips_by_value() {
        let catalog = DiseaseCatalog::load_embedded().unwrap();
        let json = catalog.to_json().unwrap();

        assert!(json.contains("\"version\""));
        assert!(json.contains("\"diseases\""));
        assert!(json.contains("Type 2 diabetes"));

        let reloaded = DiseaseCatalog::from_json(&json).unwrap();
        assert_eq!(reloaded, catalog);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let result = DiseaseCatalog::from_json("{ not json");
        assert!(matches!(result, Err(CatalogError::ParseError(_))));
    }
}
