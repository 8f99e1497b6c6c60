//! Triage assessment returned by the clinical analysis engine
//!
//! Field names follow the JSON shape requested from the provider
//! (camelCase), so the same types serve for parsing and for export.

use crate::errors::{Result, TriageError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Clinical risk stratification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Low,
        RiskLevel::Moderate,
        RiskLevel::High,
        RiskLevel::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }

    /// Color tag that mirrors this risk level
    pub fn expected_color(&self) -> TriageColor {
        match self {
            RiskLevel::Low => TriageColor::Green,
            RiskLevel::Moderate => TriageColor::Yellow,
            RiskLevel::High => TriageColor::Orange,
            RiskLevel::Critical => TriageColor::Red,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse color tag attached to an assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriageColor {
    Green,
    Yellow,
    Orange,
    Red,
}

impl TriageColor {
    pub const ALL: [TriageColor; 4] = [
        TriageColor::Green,
        TriageColor::Yellow,
        TriageColor::Orange,
        TriageColor::Red,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TriageColor::Green => "green",
            TriageColor::Yellow => "yellow",
            TriageColor::Orange => "orange",
            TriageColor::Red => "red",
        }
    }
}

/// One entry of a differential diagnosis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalCondition {
    pub name: String,
    /// Percentage likelihood, 0-100. Entries need not sum to 100.
    pub probability: f64,
    pub reasoning: String,
}

/// Structured result of one assessment request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageAssessment {
    pub risk_level: RiskLevel,
    pub primary_condition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icd10_code: Option<String>,
    pub differential_diagnosis: Vec<ClinicalCondition>,
    pub recommended_action: String,
    pub explanation: String,
    pub triage_color: TriageColor,
}

impl TriageAssessment {
    /// Parse provider text and validate it.
    ///
    /// Any JSON error, missing field, unknown enum value or out-of-range
    /// value becomes `MalformedResponse`.
    pub fn from_response_text(text: &str) -> Result<Self> {
        let assessment: TriageAssessment = serde_json::from_str(text.trim())
            .map_err(|e| TriageError::MalformedResponse(e.to_string()))?;
        assessment.validate()?;
        Ok(assessment)
    }

    /// Check the semantic constraints serde cannot express
    pub fn validate(&self) -> Result<()> {
        require_text("primaryCondition", &self.primary_condition)?;
        require_text("recommendedAction", &self.recommended_action)?;
        require_text("explanation", &self.explanation)?;

        for (index, condition) in self.differential_diagnosis.iter().enumerate() {
            if condition.name.trim().is_empty() {
                return Err(TriageError::MalformedResponse(format!(
                    "differentialDiagnosis[{}].name is blank",
                    index
                )));
            }
            if !condition.probability.is_finite()
                || condition.probability < 0.0
                || condition.probability > 100.0
            {
                return Err(TriageError::MalformedResponse(format!(
                    "differentialDiagnosis[{}].probability {} outside 0-100",
                    index, condition.probability
                )));
            }
        }

        Ok(())
    }

    /// Whether the color tag agrees with the risk level
    pub fn color_matches_risk(&self) -> bool {
        self.risk_level.expected_color() == self.triage_color
    }

    /// Differential sorted by probability, highest first
    pub fn ranked_differential(&self) -> Vec<&ClinicalCondition> {
        let mut ranked: Vec<&ClinicalCondition> = self.differential_diagnosis.iter().collect();
        ranked.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        ranked
    }
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TriageError::MalformedResponse(format!("{} is blank", field)));
    }
    Ok(())
}
