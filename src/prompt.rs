//! Prompt assembly for the clinical analysis engine
//!
//! Builds the system instruction from the patient context and joins the
//! clinician's symptom statements into the user content.

use crate::types::{EhrRecord, PatientProfile};
use std::fmt;
use std::str::FromStr;

/// Opening marker of the inline EHR section
pub const EHR_SECTION_START: &str = "--- EHR DATA ---";

/// Closing marker of the inline EHR section
pub const EHR_SECTION_END: &str = "----------------";

const ROLE_PREAMBLE: &str = "You are an advanced Clinical Triage AI Assistant.
Your role is to analyze patient symptoms in the context of their demographic and medical history, including EHR data if available.";

const TASK_STEPS: &str = "1. Analyze the reported symptoms";
const TASK_REST: &str = "2. Cross-reference with history, meds, and vitals (e.g., if BP is high and symptoms match hypertension crisis).
3. Determine the clinical risk level (Low, Moderate, High, Critical).
4. Identify the most likely primary condition.
5. Provide a differential diagnosis with estimated probabilities.
6. Recommend a clear course of action (e.g., \"Call 911\", \"Go to ER\", \"Schedule PCP appointment\", \"Home care\").";

const RULES: &str = "- Be conservative and safety-prioritizing.
- If symptoms suggest heart attack, stroke, or severe trauma, mark as Critical.
- Output MUST be valid JSON matching the schema.";

/// Clinician-reported severity attached to a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Mild,
        Severity::Moderate,
        Severity::Severe,
        Severity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Mild => "Mild",
            Severity::Moderate => "Moderate",
            Severity::Severe => "Severe",
            Severity::Critical => "Critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mild" => Ok(Severity::Mild),
            "moderate" => Ok(Severity::Moderate),
            "severe" => Ok(Severity::Severe),
            "critical" => Ok(Severity::Critical),
            other => Err(format!(
                "Unknown severity '{}'. Expected one of: mild, moderate, severe, critical",
                other
            )),
        }
    }
}

/// Message content with the severity note appended when one is selected
pub fn annotate_severity(input: &str, severity: Option<Severity>) -> String {
    match severity {
        Some(level) => format!("{} (Severity: {})", input, level),
        None => input.to_string(),
    }
}

/// Space-join every earlier user statement with the newest one
pub fn aggregate_symptoms<'a, I>(previous: I, latest: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut parts: Vec<&str> = previous.into_iter().collect();
    parts.push(latest);
    parts.join(" ")
}

/// Full system instruction for one assessment request
pub fn build_system_instruction(symptoms: &str, profile: &PatientProfile) -> String {
    let mut prompt = String::with_capacity(2048);

    prompt.push_str(ROLE_PREAMBLE);
    prompt.push_str("\n\nPATIENT CONTEXT:\n");
    prompt.push_str(&format!("Age: {}\n", profile.age));
    prompt.push_str(&format!("Gender: {}\n", profile.gender));
    prompt.push_str(&format!("Medical History: {}\n", profile.history.join(", ")));
    prompt.push_str(&format!("Allergies: {}\n", profile.allergies.join(", ")));

    if let Some(record) = profile.ehr_record() {
        prompt.push_str(&format_ehr_section(record));
    }

    prompt.push_str("\nTASK:\n");
    prompt.push_str(&format!("{}: \"{}\"\n", TASK_STEPS, symptoms));
    prompt.push_str(TASK_REST);
    prompt.push_str("\n\nRULES:\n");
    prompt.push_str(RULES);
    prompt.push('\n');

    prompt
}

/// Inline text block for synced EHR data
pub fn format_ehr_section(record: &EhrRecord) -> String {
    let medications = or_none(record.medications.join(", "));
    let vitals = or_none(
        record
            .vitals
            .iter()
            .map(|v| format!("{}: {} {}", v.kind, v.value, v.unit))
            .collect::<Vec<_>>()
            .join(", "),
    );
    let labs = or_none(
        record
            .recent_labs
            .iter()
            .map(|l| format!("{}: {} ({})", l.test, l.value, l.effective_flag()))
            .collect::<Vec<_>>()
            .join(", "),
    );

    format!(
        "{}\nCurrent Medications: {}\nRecent Vitals: {}\nRecent Labs: {}\n{}\n",
        EHR_SECTION_START, medications, vitals, labs, EHR_SECTION_END
    )
}

fn or_none(joined: String) -> String {
    if joined.is_empty() {
        "None".to_string()
    } else {
        joined
    }
}
