//! Mock clinical data for the demonstration session
//!
//! Nothing here comes from a real record system.

use crate::types::{EhrLink, EhrRecord, Gender, LabFlag, LabResult, PatientProfile, VitalSign};

/// Clinician id shown on the mock login screen
pub const DEMO_CLINICIAN_ID: &str = "DR-99281";

pub const DISCLAIMER: &str = "\
This application is a DEMONSTRATION of AI capabilities in clinical triage.
It uses a hosted large language model to simulate clinical reasoning.

1. DO NOT use this for real medical emergencies. Call 911 or your local emergency number immediately.
2. The advice generated is NOT a substitute for professional medical judgment.
3. No real patient data is stored or transmitted to a HIPAA-compliant backend in this demo version.";

pub const DISCLAIMER_REMINDER: &str =
    "Reminder: AI output is decision support only. Verify all recommendations clinically.";

pub const EHR_SYNC_NOTICE: &str =
    "EHR Sync Successful. Clinical context updated with recent vitals, labs, and medications.";

pub const ASSESSMENT_READY_NOTICE: &str = "I've analyzed the clinical presentation. \
Please review the assessment panel for risk stratification and recommendations.";

pub const ENGINE_ERROR_NOTICE: &str = "Error connecting to clinical analysis engine. \
Please try again or switch to manual protocol.";

/// Opening assistant message for a patient
pub fn greeting(patient: &PatientProfile) -> String {
    format!(
        "Hello. I am the MediTriage Assistant. I see you are accessing the profile for {} ({} {}).\n\n\
         Please describe the patient's current symptoms in detail, including onset, severity, \
         and any alleviating factors.",
        patient.name, patient.age, patient.gender
    )
}

/// Patient template every session starts from
pub fn mock_patient() -> PatientProfile {
    PatientProfile {
        id: "PT-88392".to_string(),
        name: "Alex Doe".to_string(),
        age: 45,
        gender: Gender::Male,
        history: vec![
            "Hypertension".to_string(),
            "Previous ACL repair (2018)".to_string(),
            "Mild Asthma".to_string(),
        ],
        allergies: vec!["Penicillin".to_string(), "Shellfish".to_string()],
        ehr: EhrLink::Bare,
    }
}

/// Record returned by the simulated EHR sync
pub fn mock_ehr_record() -> EhrRecord {
    let lab = |test: &str, value: &str, flag: LabFlag| LabResult {
        test: test.to_string(),
        value: value.to_string(),
        date: "2023-10-25".to_string(),
        flag: Some(flag),
    };
    let vital = |kind: &str, value: &str, unit: &str| VitalSign {
        kind: kind.to_string(),
        value: value.to_string(),
        unit: unit.to_string(),
        timestamp: "Today 09:15".to_string(),
    };

    EhrRecord {
        medications: vec![
            "Lisinopril 10mg PO Daily".to_string(),
            "Albuterol HFA 90mcg 2 Puffs q4h PRN".to_string(),
            "Atorvastatin 20mg PO Daily".to_string(),
        ],
        recent_labs: vec![
            lab("WBC", "11.5", LabFlag::High),
            lab("Creatinine", "1.1", LabFlag::Normal),
            lab("Glucose (Random)", "145", LabFlag::High),
            lab("Troponin I", "<0.03", LabFlag::Normal),
        ],
        vitals: vec![
            vital("BP", "158/96", "mmHg"),
            vital("HR", "102", "bpm"),
            vital("Temp", "99.4", "F"),
            vital("SpO2", "96", "%"),
        ],
    }
}
