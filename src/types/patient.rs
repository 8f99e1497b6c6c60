//! Patient profile and EHR record types
//!
//! The EHR link is a sum type so prompt assembly has to handle the
//! connected and bare cases explicitly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Administrative gender as recorded on the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        };
        f.write_str(label)
    }
}

/// Lab result interpretation flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabFlag {
    High,
    Low,
    Normal,
}

impl fmt::Display for LabFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LabFlag::High => "High",
            LabFlag::Low => "Low",
            LabFlag::Normal => "Normal",
        };
        f.write_str(label)
    }
}

/// A single lab result from the EHR
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabResult {
    pub test: String,
    pub value: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<LabFlag>,
}

impl LabResult {
    /// Flag to display, treating an absent flag as normal
    pub fn effective_flag(&self) -> LabFlag {
        self.flag.unwrap_or(LabFlag::Normal)
    }
}

/// A single vital sign reading from the EHR
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalSign {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    pub unit: String,
    pub timestamp: String,
}

/// Clinical data pulled in by an EHR sync
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EhrRecord {
    pub medications: Vec<String>,
    pub recent_labs: Vec<LabResult>,
    pub vitals: Vec<VitalSign>,
}

/// Whether the profile carries synced EHR data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EhrLink {
    #[default]
    Bare,
    Connected(EhrRecord),
}

/// Patient under assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub history: Vec<String>,
    pub allergies: Vec<String>,
    #[serde(default)]
    pub ehr: EhrLink,
}

impl PatientProfile {
    pub fn is_ehr_connected(&self) -> bool {
        matches!(self.ehr, EhrLink::Connected(_))
    }

    /// Synced EHR data, if any
    pub fn ehr_record(&self) -> Option<&EhrRecord> {
        match &self.ehr {
            EhrLink::Connected(record) => Some(record),
            EhrLink::Bare => None,
        }
    }

    /// Profile with the given EHR record merged in.
    ///
    /// Identity, history and allergies are kept; the EHR link is replaced.
    pub fn with_ehr(&self, record: EhrRecord) -> Self {
        Self {
            ehr: EhrLink::Connected(record),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PatientProfile {
        PatientProfile {
            id: "PT-1".to_string(),
            name: "Sam Roe".to_string(),
            age: 30,
            gender: Gender::Female,
            history: vec!["Migraine".to_string()],
            allergies: vec![],
            ehr: EhrLink::Bare,
        }
    }

    #[test]
    fn test_with_ehr_keeps_identity() {
        let profile = sample();
        let record = EhrRecord {
            medications: vec!["Sumatriptan 50mg".to_string()],
            ..Default::default()
        };

        let synced = profile.with_ehr(record.clone());
        assert!(synced.is_ehr_connected());
        assert!(!profile.is_ehr_connected());
        assert_eq!(synced.id, profile.id);
        assert_eq!(synced.history, profile.history);
        assert_eq!(synced.ehr_record(), Some(&record));
    }

    #[test]
    fn test_missing_lab_flag_reads_as_normal() {
        let lab = LabResult {
            test: "Creatinine".to_string(),
            value: "1.1".to_string(),
            date: "2023-10-25".to_string(),
            flag: None,
        };
        assert_eq!(lab.effective_flag(), LabFlag::Normal);
    }

    #[test]
    fn test_vital_sign_uses_type_key() {
        let vital = VitalSign {
            kind: "HR".to_string(),
            value: "102".to_string(),
            unit: "bpm".to_string(),
            timestamp: "Today 09:15".to_string(),
        };
        let json = serde_json::to_value(&vital).unwrap();
        assert_eq!(json["type"], "HR");
    }
}
