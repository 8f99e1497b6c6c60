//! Response schema sent with every assessment request
//!
//! Uses the provider's OpenAPI subset (upper-case type names).

use crate::types::{RiskLevel, TriageColor};
use serde_json::{json, Value};

/// Fields the provider must return
pub const REQUIRED_FIELDS: [&str; 6] = [
    "riskLevel",
    "primaryCondition",
    "differentialDiagnosis",
    "recommendedAction",
    "explanation",
    "triageColor",
];

/// JSON schema describing a `TriageAssessment`
pub fn assessment_schema() -> Value {
    let risk_levels: Vec<&str> = RiskLevel::ALL.iter().map(|r| r.as_str()).collect();
    let colors: Vec<&str> = TriageColor::ALL.iter().map(|c| c.as_str()).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "riskLevel": { "type": "STRING", "enum": risk_levels },
            "primaryCondition": { "type": "STRING" },
            "differentialDiagnosis": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "probability": {
                            "type": "NUMBER",
                            "description": "Percentage likelihood 0-100"
                        },
                        "reasoning": { "type": "STRING" }
                    },
                    "required": ["name", "probability", "reasoning"]
                }
            },
            "recommendedAction": { "type": "STRING" },
            "explanation": { "type": "STRING" },
            "triageColor": { "type": "STRING", "enum": colors }
        },
        "required": REQUIRED_FIELDS
    })
}
