//! Core domain types
//!
//! Patient profile, chat transcript and triage assessment.

pub mod assessment;
pub mod chat;
pub mod patient;

pub use assessment::{ClinicalCondition, RiskLevel, TriageAssessment, TriageColor};
pub use chat::{ChatMessage, Role, Transcript};
pub use patient::{EhrLink, EhrRecord, Gender, LabFlag, LabResult, PatientProfile, VitalSign};
