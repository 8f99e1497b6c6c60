//! Text renderers for assessments and patient records
//!
//! The panel and chart use terminal colors; the print variant is plain
//! text suitable for piping to a printer or file.

use crate::types::{ClinicalCondition, LabFlag, PatientProfile, RiskLevel, TriageAssessment};
use chrono::{DateTime, Utc};
use colored::*;
use std::fmt;

/// Width of a 100% bar in the differential chart
pub const CHART_WIDTH: usize = 30;

const RULE_WIDTH: usize = 60;

pub const EMPTY_PANEL_TEXT: &str = "Enter patient symptoms to generate a real-time clinical risk score and differential diagnosis.";

/// Color band for one differential bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarBand {
    /// Above 75%
    High,
    /// Above 40%
    Elevated,
    Baseline,
}

impl BarBand {
    pub fn for_probability(probability: f64) -> Self {
        if probability > 75.0 {
            BarBand::High
        } else if probability > 40.0 {
            BarBand::Elevated
        } else {
            BarBand::Baseline
        }
    }

    fn paint(&self, text: &str) -> ColoredString {
        match self {
            BarBand::High => text.truecolor(239, 68, 68),
            BarBand::Elevated => text.truecolor(249, 115, 22),
            BarBand::Baseline => text.truecolor(59, 130, 246),
        }
    }
}

fn paint_risk(level: RiskLevel, text: &str) -> ColoredString {
    match level {
        RiskLevel::Critical => text.white().on_red().bold(),
        RiskLevel::High => text.white().on_truecolor(249, 115, 22).bold(),
        RiskLevel::Moderate => text.black().on_yellow().bold(),
        RiskLevel::Low => text.white().on_green().bold(),
    }
}

/// Number of bar cells for a probability
pub fn bar_len(probability: f64) -> usize {
    let clamped = probability.clamp(0.0, 100.0);
    ((clamped / 100.0) * CHART_WIDTH as f64).round() as usize
}

/// Horizontal bar chart of the differential, highest probability first
struct DifferentialChart<'a>(&'a [ClinicalCondition]);

impl fmt::Display for DifferentialChart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ranked: Vec<&ClinicalCondition> = self.0.iter().collect();
        ranked.sort_by(|a, b| b.probability.total_cmp(&a.probability));

        let label_width = ranked
            .iter()
            .map(|c| c.name.chars().count())
            .max()
            .unwrap_or(0)
            .min(28);

        for condition in ranked {
            let label: String = condition.name.chars().take(label_width).collect();
            let bar = "█".repeat(bar_len(condition.probability));
            let band = BarBand::for_probability(condition.probability);
            writeln!(
                f,
                "  {:<width$} {} {:.0}%",
                label,
                band.paint(&bar),
                condition.probability,
                width = label_width
            )?;
        }
        Ok(())
    }
}

/// Full assessment panel, or the empty-state hint
struct AssessmentPanel<'a>(Option<&'a TriageAssessment>);

impl fmt::Display for AssessmentPanel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let assessment = match self.0 {
            Some(a) => a,
            None => return writeln!(f, "{}", EMPTY_PANEL_TEXT.dimmed()),
        };

        let banner = format!(" {} RISK ", assessment.risk_level.as_str().to_uppercase());
        writeln!(f, "\n{}", paint_risk(assessment.risk_level, &banner))?;
        writeln!(f, "{}", "=".repeat(RULE_WIDTH).cyan())?;

        writeln!(f, "{}", "Recommended Action".bold().cyan())?;
        writeln!(f, "  {}\n", assessment.recommended_action.bold())?;

        writeln!(f, "{}", "Clinical Reasoning".bold().cyan())?;
        writeln!(f, "  {}\n", assessment.explanation)?;

        writeln!(f, "{}", "Primary Condition".bold().cyan())?;
        match &assessment.icd10_code {
            Some(code) => writeln!(
                f,
                "  {} {}",
                assessment.primary_condition,
                format!("[ICD-10 {}]", code).dimmed()
            )?,
            None => writeln!(f, "  {}", assessment.primary_condition)?,
        }

        writeln!(f, "\n{}", "Differential Diagnosis".bold().cyan())?;
        if assessment.differential_diagnosis.is_empty() {
            writeln!(f, "  {}", "No differential provided.".dimmed())
        } else {
            write!(f, "{}", DifferentialChart(&assessment.differential_diagnosis))
        }
    }
}

/// Print-friendly assessment with a differential table and no colors
struct PrintSheet<'a> {
    patient: &'a PatientProfile,
    assessment: &'a TriageAssessment,
    printed_at: DateTime<Utc>,
}

impl fmt::Display for PrintSheet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (patient, assessment) = (self.patient, self.assessment);

        writeln!(f, "CLINICAL TRIAGE ASSESSMENT")?;
        writeln!(
            f,
            "Patient: {} ({}) | {} {} | Printed {}",
            patient.name,
            patient.id,
            patient.age,
            patient.gender,
            self.printed_at.format("%Y-%m-%d %H:%M UTC")
        )?;
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(f, "Risk Level:         {}", assessment.risk_level)?;
        writeln!(f, "Recommended Action: {}", assessment.recommended_action)?;
        writeln!(f, "Primary Condition:  {}", assessment.primary_condition)?;
        writeln!(f, "\nClinical Reasoning:\n{}", assessment.explanation)?;

        writeln!(f, "\nDifferential Diagnosis")?;
        writeln!(f, "{:<32} {:>11}  {}", "Condition", "Probability", "Reasoning")?;
        writeln!(f, "{}", "-".repeat(RULE_WIDTH))?;
        for condition in assessment.ranked_differential() {
            writeln!(
                f,
                "{:<32} {:>10.0}%  {}",
                condition.name, condition.probability, condition.reasoning
            )?;
        }
        Ok(())
    }
}

/// Patient records view: identity, history and any synced EHR data
struct RecordsView<'a>(&'a PatientProfile);

impl fmt::Display for RecordsView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let patient = self.0;
        writeln!(f, "\n{}", format!("{} ({})", patient.name, patient.id).bold().cyan())?;
        writeln!(
            f,
            "  {} {} | Allergies: {}",
            patient.age,
            patient.gender,
            list_or_none(&patient.allergies)
        )?;
        writeln!(f, "  History: {}", list_or_none(&patient.history))?;

        let record = match patient.ehr_record() {
            Some(record) => record,
            None => return writeln!(f, "  {}", "EHR not connected. Use /ehr to sync.".yellow()),
        };

        writeln!(f, "\n{}", "Medications".bold())?;
        for medication in &record.medications {
            writeln!(f, "  • {}", medication)?;
        }

        writeln!(f, "\n{}", "Vitals".bold())?;
        for vital in &record.vitals {
            writeln!(f, "  {:<8} {} {} ({})", vital.kind, vital.value, vital.unit, vital.timestamp)?;
        }

        writeln!(f, "\n{}", "Recent Labs".bold())?;
        for lab in &record.recent_labs {
            let flag = lab.effective_flag().to_string();
            let flag = match lab.effective_flag() {
                LabFlag::Normal => flag.normal(),
                _ => flag.red(),
            };
            writeln!(f, "  {:<18} {:<8} {} {}", lab.test, lab.value, flag, lab.date.dimmed())?;
        }
        Ok(())
    }
}

/// Assessment panel for the dashboard
pub fn render_panel(assessment: Option<&TriageAssessment>) -> String {
    AssessmentPanel(assessment).to_string()
}

/// Plain-text sheet for printing or piping to a file
pub fn render_print(
    patient: &PatientProfile,
    assessment: &TriageAssessment,
    printed_at: DateTime<Utc>,
) -> String {
    PrintSheet {
        patient,
        assessment,
        printed_at,
    }
    .to_string()
}

pub fn render_records(patient: &PatientProfile) -> String {
    RecordsView(patient).to_string()
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}
