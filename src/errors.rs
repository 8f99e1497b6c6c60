//! Error types for MediTriage
//!
//! A single error enum covers the assessment pipeline, session gating,
//! configuration and export. The binary converts these into `anyhow`
//! errors at the edge.

use thiserror::Error;

/// Main error type for the triage assistant
#[derive(Error, Debug)]
pub enum TriageError {
    /// No provider credential in the configured environment variable
    #[error("API key not found. Please set the {var} environment variable.")]
    MissingCredential { var: String },

    /// Provider answered but produced no text
    #[error("No response from clinical analysis engine")]
    EmptyResponse,

    /// Response text was not valid JSON or did not match the assessment schema
    #[error("Malformed assessment response: {0}")]
    MalformedResponse(String),

    /// Provider returned a non-success status or an unexpected envelope
    #[error("Provider API error: {0}")]
    ProviderApi(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session gate transitions
    #[error("Invalid session transition from {from} to {to}: {reason}")]
    InvalidTransition {
        from: String,
        to: String,
        reason: String,
    },

    /// Export or print requested before any assessment exists
    #[error("No assessment available yet")]
    NoAssessment,
}

impl TriageError {
    /// True for the failures produced by an assessment request.
    ///
    /// These are the ones the session folds into a single chat notice.
    pub fn is_assessment_failure(&self) -> bool {
        matches!(
            self,
            TriageError::MissingCredential { .. }
                | TriageError::EmptyResponse
                | TriageError::MalformedResponse(_)
                | TriageError::ProviderApi(_)
                | TriageError::Http(_)
        )
    }
}

/// Result type alias for triage operations
pub type Result<T> = std::result::Result<T, TriageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_names_variable() {
        let err = TriageError::MissingCredential {
            var: "API_KEY".to_string(),
        };
        assert!(err.to_string().contains("API_KEY"));
        assert!(err.is_assessment_failure());
    }

    #[test]
    fn test_invalid_transition_error() {
        let err = TriageError::InvalidTransition {
            from: "LoggedOut".to_string(),
            to: "Active".to_string(),
            reason: "Login required".to_string(),
        };
        assert!(err.to_string().contains("LoggedOut"));
        assert!(err.to_string().contains("Active"));
        assert!(!err.is_assessment_failure());
    }

    #[test]
    fn test_assessment_failure_classification() {
        assert!(TriageError::EmptyResponse.is_assessment_failure());
        assert!(TriageError::MalformedResponse("x".into()).is_assessment_failure());
        assert!(!TriageError::NoAssessment.is_assessment_failure());
        assert!(!TriageError::Config("bad".into()).is_assessment_failure());
    }
}
