//! Dashboard slash commands
//!
//! Parsing only; the dashboard executes them because several need the
//! async session.

use crate::prompt::Severity;
use std::path::PathBuf;

/// Dashboard command types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Accept,
    Ehr,
    Records,
    /// `None` lists the levels and the current selection
    Severity { level: Option<Severity> },
    ClearSeverity,
    Suggest { text: String },
    Assessment,
    Print,
    Export { dir: Option<PathBuf> },
    History { limit: Option<usize> },
    Patient,
    Status,
    Dismiss,
    Logout,
    Clear,
    Exit,
    Unknown { input: String },
}

/// Check whether a line is a slash command
pub fn is_command(input: &str) -> bool {
    input.trim_start().starts_with('/')
}

/// Parse input string into a command
pub fn parse(input: &str) -> Command {
    let trimmed = input.trim();
    let unknown = || Command::Unknown {
        input: input.to_string(),
    };

    let body = match trimmed.strip_prefix('/') {
        Some(body) => body,
        None => return unknown(),
    };

    let mut parts = body.splitn(2, char::is_whitespace);
    let name = match parts.next() {
        Some(name) if !name.is_empty() => name.to_lowercase(),
        _ => return unknown(),
    };
    let rest = parts.next().map(str::trim).unwrap_or("");

    match name.as_str() {
        "help" | "h" => Command::Help,
        "accept" | "agree" => Command::Accept,
        "ehr" | "connect" => Command::Ehr,
        "records" => Command::Records,
        "severity" | "sev" => match rest {
            "" => Command::Severity { level: None },
            "off" | "none" | "clear" => Command::ClearSeverity,
            value => match value.parse::<Severity>() {
                Ok(level) => Command::Severity { level: Some(level) },
                Err(_) => unknown(),
            },
        },
        "suggest" => Command::Suggest {
            text: rest.to_string(),
        },
        "assessment" | "panel" => Command::Assessment,
        "print" => Command::Print,
        "export" => Command::Export {
            dir: if rest.is_empty() {
                None
            } else {
                Some(PathBuf::from(rest))
            },
        },
        "history" => Command::History {
            limit: rest.parse().ok(),
        },
        "patient" => Command::Patient,
        "status" => Command::Status,
        "dismiss" => Command::Dismiss,
        "logout" => Command::Logout,
        "clear" | "cls" => Command::Clear,
        "exit" | "quit" | "q" => Command::Exit,
        _ => unknown(),
    }
}

/// Help table rows
pub const HELP: &[(&str, &str)] = &[
    ("/help, /h", "Show this help message"),
    ("/accept", "Acknowledge the disclaimer"),
    ("/ehr", "Sync the EHR record (or view it when connected)"),
    ("/records", "Show patient records"),
    ("/severity <level|off>", "Attach Mild/Moderate/Severe/Critical to the next message"),
    ("/suggest <text>", "Show symptom qualifiers for a draft"),
    ("/assessment", "Show the current assessment panel"),
    ("/print", "Print-friendly assessment table"),
    ("/export [dir]", "Export the assessment as JSON"),
    ("/history [n]", "Show the last n chat messages"),
    ("/patient", "Show the patient banner"),
    ("/status", "Show session status"),
    ("/dismiss", "Hide the disclaimer reminder"),
    ("/logout", "Reset the session and return to login"),
    ("/clear, /cls", "Clear screen"),
    ("/exit, /quit, /q", "Exit"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_command() {
        assert!(is_command("/help"));
        assert!(is_command("  /ehr"));
        assert!(!is_command("chest pain / pressure"));
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse("/help"), Command::Help);
        assert_eq!(parse("/H"), Command::Help);
        assert_eq!(parse("/accept"), Command::Accept);
        assert_eq!(parse("/quit"), Command::Exit);
        assert_eq!(parse("/logout"), Command::Logout);
    }

    #[test]
    fn test_parse_severity() {
        assert_eq!(
            parse("/severity Severe"),
            Command::Severity {
                level: Some(Severity::Severe)
            }
        );
        assert_eq!(parse("/severity"), Command::Severity { level: None });
        assert_eq!(parse("/sev off"), Command::ClearSeverity);
        assert!(matches!(parse("/severity extreme"), Command::Unknown { .. }));
    }

    #[test]
    fn test_parse_arguments() {
        assert_eq!(
            parse("/suggest sharp chest pain"),
            Command::Suggest {
                text: "sharp chest pain".to_string()
            }
        );
        assert_eq!(parse("/export"), Command::Export { dir: None });
        assert_eq!(
            parse("/export /tmp/out"),
            Command::Export {
                dir: Some(PathBuf::from("/tmp/out"))
            }
        );
        assert_eq!(parse("/history 5"), Command::History { limit: Some(5) });
        assert_eq!(parse("/history"), Command::History { limit: None });
    }

    #[test]
    fn test_parse_unknown() {
        assert!(matches!(parse("/frobnicate"), Command::Unknown { .. }));
        assert!(matches!(parse("/"), Command::Unknown { .. }));
        assert!(matches!(parse("fever"), Command::Unknown { .. }));
    }
}
