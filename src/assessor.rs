//! Assessment requester
//!
//! Turns accumulated symptom text plus the patient profile into one
//! completion request and a validated `TriageAssessment`. No retry,
//! caching or deduplication: every call is exactly one outbound request.

use crate::errors::{Result, TriageError};
use crate::prompt::build_system_instruction;
use crate::provider::{assessment_schema, CompletionBackend, CompletionRequest, DEFAULT_TEMPERATURE};
use crate::types::{PatientProfile, TriageAssessment};
use std::sync::Arc;
use std::time::Instant;

/// Stateless requester bound to one backend
#[derive(Clone)]
pub struct Assessor {
    backend: Arc<dyn CompletionBackend>,
    temperature: f32,
}

impl Assessor {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            backend,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Request body for the given symptoms and profile
    pub fn build_request(&self, symptoms: &str, profile: &PatientProfile) -> CompletionRequest {
        CompletionRequest {
            system_instruction: build_system_instruction(symptoms, profile),
            user_content: symptoms.to_string(),
            temperature: self.temperature,
            response_schema: assessment_schema(),
        }
    }

    /// Assess the aggregated symptom text for this patient
    pub async fn assess(&self, symptoms: &str, profile: &PatientProfile) -> Result<TriageAssessment> {
        let request = self.build_request(symptoms, profile);
        let started = Instant::now();

        let text = self
            .backend
            .complete(&request)
            .await?
            .filter(|t| !t.trim().is_empty())
            .ok_or(TriageError::EmptyResponse)?;

        let assessment = TriageAssessment::from_response_text(&text)?;

        if !assessment.color_matches_risk() {
            tracing::warn!(
                risk = %assessment.risk_level,
                color = assessment.triage_color.as_str(),
                "triage color does not mirror risk level"
            );
        }

        tracing::info!(
            model = self.backend.model(),
            patient = %profile.id,
            risk = %assessment.risk_level,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "assessment completed"
        );

        Ok(assessment)
    }

    pub fn model(&self) -> &str {
        self.backend.model()
    }
}
