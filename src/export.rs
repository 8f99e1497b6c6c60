//! Assessment export to JSON files
//!
//! Writes `{patient, assessment, timestamp}` to
//! `triage_assessment_<patientId>_<epochMillis>.json` and reads it back.

use crate::errors::{Result, TriageError};
use crate::types::{Gender, PatientProfile, TriageAssessment};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Identity fields copied into an export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
}

impl From<&PatientProfile> for PatientSummary {
    fn from(profile: &PatientProfile) -> Self {
        Self {
            id: profile.id.clone(),
            name: profile.name.clone(),
            age: profile.age,
            gender: profile.gender,
        }
    }
}

/// Contents of one export file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub patient: PatientSummary,
    pub assessment: TriageAssessment,
    pub timestamp: DateTime<Utc>,
}

impl ExportRecord {
    pub fn new(patient: &PatientProfile, assessment: &TriageAssessment, timestamp: DateTime<Utc>) -> Self {
        Self {
            patient: PatientSummary::from(patient),
            assessment: assessment.clone(),
            timestamp,
        }
    }

    /// File name derived from patient id and timestamp
    pub fn file_name(&self) -> String {
        export_file_name(&self.patient.id, self.timestamp)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn export_file_name(patient_id: &str, at: DateTime<Utc>) -> String {
    format!("triage_assessment_{}_{}.json", patient_id, at.timestamp_millis())
}

/// Write the current assessment into `dir`, returning the file path
pub fn export_assessment(
    dir: &Path,
    patient: &PatientProfile,
    assessment: Option<&TriageAssessment>,
) -> Result<PathBuf> {
    let assessment = assessment.ok_or(TriageError::NoAssessment)?;
    let record = ExportRecord::new(patient, assessment, Utc::now());

    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let path = dir.join(record.file_name());
    fs::write(&path, record.to_json()?)?;

    tracing::info!(path = %path.display(), patient = %patient.id, "assessment exported");
    Ok(path)
}

/// Read an export file back
pub fn load_export(path: &Path) -> Result<ExportRecord> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{mock_ehr_record, mock_patient};
    use crate::types::{ClinicalCondition, RiskLevel, TriageColor};
    use chrono::TimeZone;

    fn assessment() -> TriageAssessment {
        TriageAssessment {
            risk_level: RiskLevel::Critical,
            primary_condition: "Acute coronary syndrome".to_string(),
            icd10_code: Some("I24.9".to_string()),
            differential_diagnosis: vec![ClinicalCondition {
                name: "Acute coronary syndrome".to_string(),
                probability: 80.0,
                reasoning: "Crushing chest pressure radiating to arm".to_string(),
            }],
            recommended_action: "Call 911".to_string(),
            explanation: "Classic ischemic presentation.".to_string(),
            triage_color: TriageColor::Red,
        }
    }

    #[test]
    fn test_file_name_format() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(
            export_file_name("PT-88392", at),
            "triage_assessment_PT-88392_1700000000123.json"
        );
    }

    #[test]
    fn test_record_has_exact_top_level_keys() {
        let patient = mock_patient().with_ehr(mock_ehr_record());
        let record = ExportRecord::new(&patient, &assessment(), Utc::now());
        let value = serde_json::to_value(&record).unwrap();

        let mut keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        keys.sort();
        assert_eq!(keys, vec!["assessment", "patient", "timestamp"]);

        let mut patient_keys: Vec<&String> = value["patient"].as_object().unwrap().keys().collect();
        patient_keys.sort();
        assert_eq!(patient_keys, vec!["age", "gender", "id", "name"]);
        assert_eq!(value["assessment"]["riskLevel"], "Critical");
    }

    #[test]
    fn test_export_without_assessment_fails() {
        let dir = std::env::temp_dir();
        let err = export_assessment(&dir, &mock_patient(), None).unwrap_err();
        assert!(matches!(err, TriageError::NoAssessment));
    }
}
