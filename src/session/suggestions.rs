//! Quick symptom qualifiers offered while the clinician types

/// Keyword to qualifier table, in display priority order
const SYMPTOM_SUGGESTIONS: &[(&str, &[&str])] = &[
    ("fever", &["High grade (>103°F)", "With chills", "Night sweats", "Responding to meds"]),
    ("cough", &["Dry", "Productive (phlegm)", "Barking", "Blood-tinged"]),
    ("headache", &["Throbbing", "Light sensitive", "With nausea", "Sudden onset"]),
    ("pain", &["Sharp", "Dull", "Radiating", "Constant", "Intermittent"]),
    ("chest", &["Crushing pressure", "Radiating to arm", "Worse breathing", "Palpitations"]),
    ("breath", &["At rest", "With exertion", "Wheezing", "Cannot lie flat"]),
    ("stomach", &["Upper right", "Lower right", "Nausea", "Bloating", "After eating"]),
    ("abdominal", &["Upper right", "Lower right", "Nausea", "Bloating", "After eating"]),
    ("dizzy", &["Room spinning", "Lightheaded", "On standing", "Passing out"]),
];

/// Maximum suggestions shown at once
pub const MAX_SUGGESTIONS: usize = 5;

/// Qualifiers for every keyword found in `input`, minus those already typed
pub fn suggestions_for(input: &str) -> Vec<&'static str> {
    if input.trim().is_empty() {
        return Vec::new();
    }

    let lower = input.to_lowercase();
    let mut found: Vec<&'static str> = Vec::new();

    for (keyword, qualifiers) in SYMPTOM_SUGGESTIONS {
        if !lower.contains(keyword) {
            continue;
        }
        for &qualifier in qualifiers.iter() {
            if !found.contains(&qualifier) {
                found.push(qualifier);
            }
        }
    }

    found
        .into_iter()
        .filter(|s| !lower.contains(&s.to_lowercase()))
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Input text after appending a chosen suggestion
pub fn append_suggestion(input: &str, suggestion: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return suggestion.to_string();
    }

    let ends_with_punctuation = trimmed
        .chars()
        .last()
        .map(|c| matches!(c, '.' | ',' | ';' | '?' | '!'))
        .unwrap_or(false);

    let separator = if ends_with_punctuation { " " } else { ", " };
    format!("{}{}{}", trimmed, separator, suggestion)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_has_no_suggestions() {
        assert!(suggestions_for("   ").is_empty());
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let found = suggestions_for("Patient has a COUGH");
        assert_eq!(found, vec!["Dry", "Productive (phlegm)", "Barking", "Blood-tinged"]);
    }

    #[test]
    fn test_typed_qualifiers_are_filtered() {
        let found = suggestions_for("dry cough");
        assert!(!found.contains(&"Dry"));
        assert!(found.contains(&"Barking"));
    }

    #[test]
    fn test_duplicates_removed_and_capped() {
        let found = suggestions_for("stomach and abdominal pain");
        assert_eq!(found.len(), MAX_SUGGESTIONS);
        let unique: std::collections::HashSet<_> = found.iter().collect();
        assert_eq!(unique.len(), found.len());
        // "pain" precedes "stomach" in the table
        assert_eq!(found[0], "Sharp");
    }

    #[test]
    fn test_append_suggestion_separators() {
        assert_eq!(append_suggestion("", "Dry"), "Dry");
        assert_eq!(append_suggestion("cough ", "Dry"), "cough, Dry");
        assert_eq!(append_suggestion("cough.", "Dry"), "cough. Dry");
        assert_eq!(append_suggestion("is it bad?", "Sharp"), "is it bad? Sharp");
    }
}
