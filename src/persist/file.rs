use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use super::{DiagnosisRecord, PersistenceError, PersistenceSink};

/// Appends each diagnosis as one JSON line to a file, creating it if needed
#[derive(Debug, Clone)]
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceSink for JsonlSink {
    async fn persist(&self, record: &DiagnosisRecord) -> Result<(), PersistenceError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;

        tracing::info!(
            patient = %record.patient_id,
            disease = %record.disease,
            path = %self.path.display(),
            "Saved diagnosis"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{PatientId, Symptom};

    #[tokio::test]
    async fn test_appends_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diagnoses.jsonl");
        let sink = JsonlSink::new(&path);

        for disease in ["Flu", "Unknown"] {
            let record = DiagnosisRecord {
                patient_id: PatientId(3),
                symptoms: vec![Symptom::from("cough")],
                disease: disease.to_string(),
                treatment: vec!["rest".to_string()],
                recorded_at: chrono::Utc::now(),
            };
            sink.persist(&record).await.unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: DiagnosisRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.disease, "Flu");
        assert_eq!(first.patient_id, PatientId(3));
    }

    #[tokio::test]
    async fn test_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonlSink::new(dir.path().join("missing").join("out.jsonl"));

        let record = DiagnosisRecord {
            patient_id: PatientId(1),
            symptoms: vec![],
            disease: "Flu".to_string(),
            treatment: vec![],
            recorded_at: chrono::Utc::now(),
        };
        let err = sink.persist(&record).await.unwrap_err();
        assert!(matches!(err, PersistenceError::Io(_)));
    }
}
