//! Triage session context
//!
//! One explicit object owns everything a dashboard session touches:
//! - Access gate (login, disclaimer)
//! - Patient profile (replaced on EHR sync, reset on logout)
//! - Append-only chat transcript
//! - The single current assessment (replaced, never merged)
//!
//! `send` borrows the session mutably for the whole request, so a second
//! assessment cannot start while one is outstanding.

pub mod phase;
pub mod suggestions;

use crate::assessor::Assessor;
use crate::errors::{Result, TriageError};
use crate::fixtures;
use crate::prompt::{aggregate_symptoms, annotate_severity, Severity};
use crate::types::{ChatMessage, PatientProfile, Transcript, TriageAssessment};
use chrono::{DateTime, Utc};
use std::time::Duration;

pub use phase::{PhaseEvent, SessionPhase};
pub use suggestions::{append_suggestion, suggestions_for};

/// Default simulated EHR round trip
pub const DEFAULT_EHR_SYNC_LATENCY: Duration = Duration::from_millis(1500);

/// Default number of sends between disclaimer reminders
pub const DEFAULT_REMINDER_EVERY: u32 = 3;

/// Tunables for a session
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub ehr_sync_latency: Duration,
    pub reminder_every: u32,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            ehr_sync_latency: DEFAULT_EHR_SYNC_LATENCY,
            reminder_every: DEFAULT_REMINDER_EVERY,
        }
    }
}

/// Result of one `send`
#[derive(Debug)]
pub enum SendOutcome {
    /// Blank input, nothing happened
    Ignored,
    /// Assessment replaced
    Assessed,
    /// Request failed; previous assessment kept and a notice appended
    Failed(TriageError),
}

/// Result of `connect_ehr`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EhrSync {
    AlreadyConnected,
    Synced,
}

/// Session state for one clinician at the dashboard
pub struct TriageSession {
    assessor: Assessor,
    options: SessionOptions,
    phase: SessionPhase,
    clinician_id: Option<String>,
    patient: PatientProfile,
    transcript: Transcript,
    assessment: Option<TriageAssessment>,
    assessed_at: Option<DateTime<Utc>>,
    severity: Option<Severity>,
    send_count: u32,
    reminder_visible: bool,
}

impl TriageSession {
    pub fn new(assessor: Assessor, options: SessionOptions) -> Self {
        Self {
            assessor,
            options,
            phase: SessionPhase::LoggedOut,
            clinician_id: None,
            patient: fixtures::mock_patient(),
            transcript: Transcript::new(),
            assessment: None,
            assessed_at: None,
            severity: None,
            send_count: 0,
            reminder_visible: false,
        }
    }

    /// Mock login; any clinician id is accepted
    pub fn login(&mut self, clinician_id: &str) -> Result<()> {
        self.phase = self.phase.transition(PhaseEvent::Login)?;
        self.clinician_id = Some(clinician_id.to_string());

        self.transcript.push(ChatMessage::system(fixtures::DISCLAIMER));
        self.transcript
            .push(ChatMessage::assistant(fixtures::greeting(&self.patient)));

        tracing::info!(clinician = clinician_id, patient = %self.patient.id, "clinician logged in");
        Ok(())
    }

    pub fn accept_disclaimer(&mut self) -> Result<()> {
        self.phase = self.phase.transition(PhaseEvent::AcceptDisclaimer)?;
        tracing::debug!("disclaimer accepted");
        Ok(())
    }

    /// Tear down everything and return to the login screen
    pub fn logout(&mut self) -> Result<()> {
        self.phase = self.phase.transition(PhaseEvent::Logout)?;
        self.clinician_id = None;
        self.patient = fixtures::mock_patient();
        self.transcript = Transcript::new();
        self.assessment = None;
        self.assessed_at = None;
        self.severity = None;
        self.send_count = 0;
        self.reminder_visible = false;
        tracing::info!("session reset on logout");
        Ok(())
    }

    /// Toggle a severity selection; picking the current level clears it
    pub fn select_severity(&mut self, level: Severity) -> Option<Severity> {
        self.severity = if self.severity == Some(level) {
            None
        } else {
            Some(level)
        };
        self.severity
    }

    pub fn clear_severity(&mut self) {
        self.severity = None;
    }

    /// Submit a symptom statement and request a fresh assessment
    pub async fn send(&mut self, input: &str) -> Result<SendOutcome> {
        self.ensure_active("send")?;

        if input.trim().is_empty() {
            return Ok(SendOutcome::Ignored);
        }

        self.send_count += 1;
        if self.options.reminder_every > 0 && self.send_count % self.options.reminder_every == 0 {
            self.reminder_visible = true;
        }

        let content = annotate_severity(input, self.severity.take());
        let symptoms = aggregate_symptoms(self.transcript.user_contents(), &content);
        self.transcript.push(ChatMessage::user(content));

        match self.assessor.assess(&symptoms, &self.patient).await {
            Ok(assessment) => {
                self.assessment = Some(assessment);
                self.assessed_at = Some(Utc::now());
                self.transcript
                    .push(ChatMessage::assistant(fixtures::ASSESSMENT_READY_NOTICE));
                Ok(SendOutcome::Assessed)
            }
            Err(e) if e.is_assessment_failure() => {
                tracing::error!(error = %e, "assessment request failed");
                self.transcript
                    .push(ChatMessage::system(fixtures::ENGINE_ERROR_NOTICE));
                Ok(SendOutcome::Failed(e))
            }
            Err(e) => Err(e),
        }
    }

    /// Simulated EHR sync; merges the mock record into the profile
    pub async fn connect_ehr(&mut self) -> Result<EhrSync> {
        self.ensure_active("connect EHR")?;

        if self.patient.is_ehr_connected() {
            return Ok(EhrSync::AlreadyConnected);
        }

        if !self.options.ehr_sync_latency.is_zero() {
            tokio::time::sleep(self.options.ehr_sync_latency).await;
        }

        self.patient = self.patient.with_ehr(fixtures::mock_ehr_record());
        self.transcript
            .push(ChatMessage::system(fixtures::EHR_SYNC_NOTICE));

        tracing::info!(patient = %self.patient.id, "EHR record synced");
        Ok(EhrSync::Synced)
    }

    pub fn dismiss_reminder(&mut self) {
        self.reminder_visible = false;
    }

    fn ensure_active(&self, action: &str) -> Result<()> {
        if self.phase.is_active() {
            return Ok(());
        }
        Err(TriageError::InvalidTransition {
            from: format!("{:?}", self.phase),
            to: action.to_string(),
            reason: match self.phase {
                SessionPhase::LoggedOut => "Login required".to_string(),
                _ => "Disclaimer must be accepted first".to_string(),
            },
        })
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn clinician_id(&self) -> Option<&str> {
        self.clinician_id.as_deref()
    }

    pub fn patient(&self) -> &PatientProfile {
        &self.patient
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn assessment(&self) -> Option<&TriageAssessment> {
        self.assessment.as_ref()
    }

    pub fn assessed_at(&self) -> Option<DateTime<Utc>> {
        self.assessed_at
    }

    pub fn severity(&self) -> Option<Severity> {
        self.severity
    }

    pub fn send_count(&self) -> u32 {
        self.send_count
    }

    pub fn reminder_visible(&self) -> bool {
        self.reminder_visible
    }

    pub fn model(&self) -> &str {
        self.assessor.model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{CompletionBackend, CompletionRequest};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Unreachable;

    #[async_trait]
    impl CompletionBackend for Unreachable {
        async fn complete(&self, _request: &CompletionRequest) -> Result<Option<String>> {
            Err(TriageError::ProviderApi("HTTP 503: unavailable".to_string()))
        }

        fn model(&self) -> &str {
            "unreachable"
        }
    }

    struct BrokenConfig;

    #[async_trait]
    impl CompletionBackend for BrokenConfig {
        async fn complete(&self, _request: &CompletionRequest) -> Result<Option<String>> {
            Err(TriageError::Config("bad timeout".to_string()))
        }

        fn model(&self) -> &str {
            "broken"
        }
    }

    fn session() -> TriageSession {
        let options = SessionOptions {
            ehr_sync_latency: Duration::ZERO,
            ..Default::default()
        };
        TriageSession::new(Assessor::new(Arc::new(Unreachable)), options)
    }

    #[test]
    fn test_login_seeds_transcript() {
        let mut s = session();
        s.login("DR-1").unwrap();
        assert_eq!(s.phase(), SessionPhase::AwaitingDisclaimer);
        assert_eq!(s.transcript().len(), 2);
        assert_eq!(s.clinician_id(), Some("DR-1"));
    }

    #[tokio::test]
    async fn test_send_requires_disclaimer() {
        let mut s = session();
        s.login("DR-1").unwrap();
        let err = s.send("fever").await.unwrap_err();
        assert!(matches!(err, TriageError::InvalidTransition { .. }));
        assert_eq!(s.send_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_send_is_ignored() {
        let mut s = session();
        s.login("DR-1").unwrap();
        s.accept_disclaimer().unwrap();
        assert!(matches!(s.send("   ").await.unwrap(), SendOutcome::Ignored));
        assert_eq!(s.transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_send_appends_notice() {
        let mut s = session();
        s.login("DR-1").unwrap();
        s.accept_disclaimer().unwrap();

        let outcome = s.send("fever").await.unwrap();
        assert!(matches!(outcome, SendOutcome::Failed(TriageError::ProviderApi(_))));
        assert_eq!(
            s.transcript().last().unwrap().content,
            fixtures::ENGINE_ERROR_NOTICE
        );
        assert!(s.assessment().is_none());
    }

    #[test]
    fn test_severity_toggle() {
        let mut s = session();
        assert_eq!(s.select_severity(Severity::Mild), Some(Severity::Mild));
        assert_eq!(s.select_severity(Severity::Severe), Some(Severity::Severe));
        assert_eq!(s.select_severity(Severity::Severe), None);
    }

    #[tokio::test]
    async fn test_connect_ehr_once() {
        let mut s = session();
        s.login("DR-1").unwrap();
        s.accept_disclaimer().unwrap();

        assert_eq!(s.connect_ehr().await.unwrap(), EhrSync::Synced);
        assert!(s.patient().is_ehr_connected());
        assert_eq!(s.transcript().last().unwrap().content, fixtures::EHR_SYNC_NOTICE);

        let before = s.transcript().len();
        assert_eq!(s.connect_ehr().await.unwrap(), EhrSync::AlreadyConnected);
        assert_eq!(s.transcript().len(), before);
    }

    #[tokio::test]
    async fn test_logout_resets_everything() {
        let mut s = session();
        s.login("DR-1").unwrap();
        s.accept_disclaimer().unwrap();
        s.connect_ehr().await.unwrap();
        s.select_severity(Severity::Mild);

        s.logout().unwrap();
        assert_eq!(s.phase(), SessionPhase::LoggedOut);
        assert!(!s.patient().is_ehr_connected());
        assert!(s.transcript().is_empty());
        assert!(s.severity().is_none());
        assert!(s.clinician_id().is_none());
    }

    #[tokio::test]
    async fn test_non_assessment_error_propagates() {
        let options = SessionOptions {
            ehr_sync_latency: Duration::ZERO,
            ..Default::default()
        };
        let mut s = TriageSession::new(Assessor::new(Arc::new(BrokenConfig)), options);
        s.login("DR-1").unwrap();
        s.accept_disclaimer().unwrap();

        let err = s.send("fever").await.unwrap_err();
        assert!(matches!(err, TriageError::Config(_)));
        assert_ne!(
            s.transcript().last().unwrap().content,
            fixtures::ENGINE_ERROR_NOTICE
        );
    }

    #[test]
    fn test_logout_from_every_phase() {
        let mut s = session();
        s.logout().unwrap();
        assert_eq!(s.phase(), SessionPhase::LoggedOut);

        s.login("DR-1").unwrap();
        s.logout().unwrap();
        assert_eq!(s.phase(), SessionPhase::LoggedOut);

        s.login("DR-1").unwrap();
        s.accept_disclaimer().unwrap();
        s.logout().unwrap();
        assert_eq!(s.phase(), SessionPhase::LoggedOut);
        assert!(s.login("DR-2").is_ok());
    }
}
