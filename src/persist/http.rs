use std::time::Duration;

use serde::Serialize;

use super::{DiagnosisRecord, PersistenceError, PersistenceSink};
use crate::core::types::Symptom;

/// Path of the diagnostics resource on the clinic backend
pub const DIAGNOSTICS_PATH: &str = "/api/diagnostics";

/// Request timeout for a single save
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Body accepted by the backend's diagnostics resource.
///
/// Field names are the backend's and must not change independently of it.
#[derive(Debug, Serialize)]
pub struct DiagnosticPayload<'a> {
    pub patient_id: u64,
    #[serde(rename = "symptomes")]
    pub symptoms: &'a [Symptom],
    #[serde(rename = "maladie")]
    pub disease: &'a str,
    #[serde(rename = "traitements")]
    pub treatment: &'a [String],
}

impl<'a> From<&'a DiagnosisRecord> for DiagnosticPayload<'a> {
    fn from(record: &'a DiagnosisRecord) -> Self {
        Self {
            patient_id: record.patient_id.0,
            symptoms: &record.symptoms,
            disease: &record.disease,
            treatment: &record.treatment,
        }
    }
}

/// Posts diagnoses to the clinic backend
#[derive(Debug, Clone)]
pub struct HttpSink {
    http: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpSink {
    /// Create a sink for the backend rooted at `api_base` (e.g. `http://localhost:5000`)
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_base: &str, token: Option<String>) -> Result<Self, PersistenceError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("symptom-dx/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            endpoint: format!("{}{DIAGNOSTICS_PATH}", api_base.trim_end_matches('/')),
            token,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl PersistenceSink for HttpSink {
    async fn persist(&self, record: &DiagnosisRecord) -> Result<(), PersistenceError> {
        let mut request = self
            .http
            .post(&self.endpoint)
            .json(&DiagnosticPayload::from(record));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Backend rejected diagnosis");
            return Err(PersistenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(
            patient = %record.patient_id,
            disease = %record.disease,
            "Posted diagnosis"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PatientId;

    #[test]
    fn test_payload_uses_backend_field_names() {
        let record = DiagnosisRecord {
            patient_id: PatientId(12),
            symptoms: vec![Symptom::from("fever"), Symptom::from("cough")],
            disease: "Flu".to_string(),
            treatment: vec!["rest".to_string(), "hydration".to_string()],
            recorded_at: chrono::Utc::now(),
        };

        let json = serde_json::to_value(DiagnosticPayload::from(&record)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "patient_id": 12,
                "symptomes": ["fever", "cough"],
                "maladie": "Flu",
                "traitements": ["rest", "hydration"],
            })
        );
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let sink = HttpSink::new("http://localhost:5000/", None).unwrap();
        assert_eq!(sink.endpoint(), "http://localhost:5000/api/diagnostics");
    }
}
