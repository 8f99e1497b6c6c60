//! Command-line argument parsing for MediTriage
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// MediTriage - clinical triage assistant demo backed by a hosted LLM
#[derive(Parser, Debug)]
#[command(name = "meditriage")]
#[command(version)]
#[command(about = "Describe symptoms, get a structured triage assessment (demonstration only)", long_about = None)]
pub struct Args {
    /// Symptom description for a one-shot assessment
    #[arg(value_name = "SYMPTOMS")]
    pub symptoms: Option<String>,

    /// Model to use (overrides config)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Provider base URL (overrides config)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Sync the mock EHR record before assessing
    #[arg(long)]
    pub ehr: bool,

    /// Severity to attach to the symptoms: mild, moderate, severe, critical
    #[arg(long)]
    pub severity: Option<String>,

    /// Write the assessment as JSON into this directory
    #[arg(long, value_name = "DIR")]
    pub export: Option<PathBuf>,

    /// Print the assessment as raw JSON instead of the panel
    #[arg(long)]
    pub json: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress all output except final result)
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the interactive triage dashboard
    Start,

    /// Run configuration and connectivity checks
    Doctor,

    /// Display current configuration
    Config {
        /// Write the default configuration file (fails if it already exists)
        #[arg(long)]
        init: bool,
    },

    /// Show the mock patient profile
    Patient {
        /// Include the mock EHR record
        #[arg(long)]
        ehr: bool,
    },
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Check that symptoms and subcommands are not mixed
    pub fn validate(&self) -> Result<(), String> {
        if self.command.is_some() && self.symptoms.is_some() {
            return Err("Cannot specify symptoms with a subcommand.".to_string());
        }

        if self.symptoms.is_none()
            && (self.ehr || self.severity.is_some() || self.export.is_some() || self.json)
        {
            return Err("--ehr, --severity, --export and --json require SYMPTOMS.".to_string());
        }

        Ok(())
    }
}

impl Verbosity {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }

    /// Parse the config file spelling
    pub fn from_config(value: &str) -> Self {
        match value {
            "quiet" => Verbosity::Quiet,
            "verbose" => Verbosity::Verbose,
            "very_verbose" => Verbosity::VeryVerbose,
            _ => Verbosity::Normal,
        }
    }

    /// Default tracing filter directive for this level
    pub fn log_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "meditriage=info,warn",
            Verbosity::VeryVerbose => "meditriage=debug,info",
        }
    }

    /// Check if should show the spinner
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }

    /// Check if should show failure details
    pub fn show_details(&self) -> bool {
        matches!(self, Verbosity::Verbose | Verbosity::VeryVerbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(parse(&["meditriage", "-q"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["meditriage"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["meditriage", "-v"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["meditriage", "-vv"]).verbosity(), Verbosity::VeryVerbose);
    }

    #[test]
    fn test_one_shot_flags() {
        let args = parse(&[
            "meditriage",
            "chest pain",
            "--ehr",
            "--severity",
            "severe",
            "--export",
            "/tmp/out",
        ]);
        assert_eq!(args.symptoms.as_deref(), Some("chest pain"));
        assert!(args.ehr);
        assert_eq!(args.severity.as_deref(), Some("severe"));
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_subcommand_parses() {
        let args = parse(&["meditriage", "patient", "--ehr"]);
        assert!(matches!(args.command, Some(Commands::Patient { ehr: true })));
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_config_init_flag() {
        let args = parse(&["meditriage", "config", "--init"]);
        assert!(matches!(args.command, Some(Commands::Config { init: true })));
        let args = parse(&["meditriage", "config"]);
        assert!(matches!(args.command, Some(Commands::Config { init: false })));
    }

    #[test]
    fn test_validate_fail_symptoms_with_subcommand() {
        let args = parse(&["meditriage", "doctor"]);
        let mixed = Args {
            symptoms: Some("fever".to_string()),
            ..args
        };
        assert!(mixed.validate().is_err());
    }

    #[test]
    fn test_validate_fail_flags_without_symptoms() {
        let args = parse(&["meditriage", "--json"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_verbosity_methods() {
        assert!(!Verbosity::Quiet.show_progress());
        assert!(Verbosity::Normal.show_progress());
        assert!(!Verbosity::Normal.show_details());
        assert!(Verbosity::Verbose.show_details());
        assert_eq!(Verbosity::from_config("very_verbose"), Verbosity::VeryVerbose);
        assert_eq!(Verbosity::from_config("bogus"), Verbosity::Normal);
    }
}
