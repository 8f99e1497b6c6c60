//! Session integration tests
//!
//! Drives a full dashboard session against a scripted backend that records
//! every request it receives.

use async_trait::async_trait;
use meditriage::{
    assessor::Assessor,
    fixtures,
    prompt::{Severity, EHR_SECTION_START},
    provider::{CompletionBackend, CompletionRequest},
    session::{EhrSync, SendOutcome, SessionOptions, SessionPhase, TriageSession},
    types::{RiskLevel, Role},
    Result, TriageError,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

enum Reply {
    Text(String),
    Empty,
    Fail,
}

struct ScriptedBackend {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedBackend {
    fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>> {
        self.requests.lock().unwrap().push(request.clone());
        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Text(text)) => Ok(Some(text)),
            Some(Reply::Empty) => Ok(None),
            Some(Reply::Fail) | None => Err(TriageError::ProviderApi("HTTP 500: boom".to_string())),
        }
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

fn assessment_json(risk: &str, color: &str, primary: &str) -> Reply {
    Reply::Text(format!(
        r#"{{
            "riskLevel": "{risk}",
            "primaryCondition": "{primary}",
            "icd10Code": "R07.9",
            "differentialDiagnosis": [
                {{"name": "{primary}", "probability": 70, "reasoning": "Best fit"}},
                {{"name": "Anxiety", "probability": 10, "reasoning": "Diagnosis of exclusion"}}
            ],
            "recommendedAction": "Follow protocol",
            "explanation": "Derived from the presentation.",
            "triageColor": "{color}"
        }}"#
    ))
}

fn active_session(backend: Arc<ScriptedBackend>) -> TriageSession {
    let options = SessionOptions {
        ehr_sync_latency: Duration::ZERO,
        reminder_every: 3,
    };
    let mut session = TriageSession::new(Assessor::new(backend), options);
    session.login(fixtures::DEMO_CLINICIAN_ID).unwrap();
    session.accept_disclaimer().unwrap();
    session
}

#[tokio::test]
async fn test_send_requires_accepted_disclaimer() {
    let backend = ScriptedBackend::new(vec![]);
    let mut session = TriageSession::new(Assessor::new(backend.clone()), SessionOptions::default());

    assert!(session.send("fever").await.is_err());
    session.login("DR-1").unwrap();
    assert_eq!(session.phase(), SessionPhase::AwaitingDisclaimer);
    assert!(session.send("fever").await.is_err());
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_assessment_replaced_not_merged() {
    let backend = ScriptedBackend::new(vec![
        assessment_json("Low", "green", "Tension headache"),
        assessment_json("Critical", "red", "Subarachnoid hemorrhage"),
    ]);
    let mut session = active_session(backend);

    session.send("headache").await.unwrap();
    assert_eq!(session.assessment().unwrap().risk_level, RiskLevel::Low);

    session.send("worst headache of my life, sudden onset").await.unwrap();
    let current = session.assessment().unwrap();
    assert_eq!(current.risk_level, RiskLevel::Critical);
    assert_eq!(current.primary_condition, "Subarachnoid hemorrhage");
    assert_eq!(current.differential_diagnosis.len(), 2);
}

#[tokio::test]
async fn test_failure_keeps_previous_assessment() {
    let backend = ScriptedBackend::new(vec![
        assessment_json("Moderate", "yellow", "Bronchitis"),
        Reply::Fail,
        Reply::Empty,
        Reply::Text("not json at all".to_string()),
    ]);
    let mut session = active_session(backend);

    session.send("productive cough").await.unwrap();
    let before = session.assessment().cloned();

    for input in ["fever", "chills", "night sweats"] {
        let outcome = session.send(input).await.unwrap();
        assert!(matches!(outcome, SendOutcome::Failed(_)));
        assert_eq!(session.assessment().cloned(), before);

        let last = session.transcript().last().unwrap();
        assert_eq!(last.role, Role::System);
        assert_eq!(last.content, fixtures::ENGINE_ERROR_NOTICE);
    }
}

#[tokio::test]
async fn test_failure_outcome_carries_cause() {
    let backend = ScriptedBackend::new(vec![Reply::Empty]);
    let mut session = active_session(backend);

    match session.send("dizziness").await.unwrap() {
        SendOutcome::Failed(TriageError::EmptyResponse) => {}
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_request_aggregates_every_user_message() {
    let backend = ScriptedBackend::new(vec![
        assessment_json("Low", "green", "Gastritis"),
        Reply::Fail,
        assessment_json("High", "orange", "Appendicitis"),
    ]);
    let mut session = active_session(backend.clone());

    session.send("abdominal pain").await.unwrap();
    session.send("since last night").await.unwrap();
    session.select_severity(Severity::Severe);
    session.send("moved to lower right").await.unwrap();

    let requests = backend.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].user_content, "abdominal pain");
    assert_eq!(
        requests[2].user_content,
        "abdominal pain since last night moved to lower right (Severity: Severe)"
    );
    assert!(requests[2]
        .system_instruction
        .contains("abdominal pain since last night moved to lower right (Severity: Severe)"));
    assert!(session.severity().is_none());
}

#[tokio::test]
async fn test_ehr_section_only_after_sync() {
    let backend = ScriptedBackend::new(vec![
        assessment_json("Low", "green", "Viral syndrome"),
        assessment_json("Low", "green", "Viral syndrome"),
    ]);
    let mut session = active_session(backend.clone());

    session.send("malaise").await.unwrap();
    assert_eq!(session.connect_ehr().await.unwrap(), EhrSync::Synced);
    assert_eq!(session.connect_ehr().await.unwrap(), EhrSync::AlreadyConnected);
    session.send("low grade fever").await.unwrap();

    let requests = backend.requests();
    assert!(!requests[0].system_instruction.contains(EHR_SECTION_START));
    assert!(requests[1].system_instruction.contains(EHR_SECTION_START));
    assert!(requests[1].system_instruction.contains("Lisinopril"));
}

#[tokio::test]
async fn test_blank_input_is_ignored() {
    let backend = ScriptedBackend::new(vec![]);
    let mut session = active_session(backend.clone());
    let before = session.transcript().len();

    assert!(matches!(session.send("   ").await.unwrap(), SendOutcome::Ignored));
    assert_eq!(session.transcript().len(), before);
    assert_eq!(session.send_count(), 0);
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_reminder_every_third_send() {
    let backend = ScriptedBackend::new(vec![]);
    let mut session = active_session(backend);

    session.send("one").await.unwrap();
    session.send("two").await.unwrap();
    assert!(!session.reminder_visible());
    session.send("three").await.unwrap();
    assert!(session.reminder_visible());

    session.dismiss_reminder();
    assert!(!session.reminder_visible());
}

#[tokio::test]
async fn test_logout_resets_everything() {
    let backend = ScriptedBackend::new(vec![assessment_json("Low", "green", "Sprain")]);
    let mut session = active_session(backend);

    session.connect_ehr().await.unwrap();
    session.send("ankle pain").await.unwrap();
    session.logout().unwrap();

    assert_eq!(session.phase(), SessionPhase::LoggedOut);
    assert!(session.assessment().is_none());
    assert!(session.transcript().is_empty());
    assert!(!session.patient().is_ehr_connected());
    assert!(session.clinician_id().is_none());
}
