//! Display manager for the dashboard terminal UI
//!
//! Owns the analysis spinner and all colored chat output.

use crate::types::{ChatMessage, PatientProfile, Role};
use colored::*;
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::time::Duration;

/// Display manager for dashboard UI
pub struct DisplayManager {
    current_bar: Option<ProgressBar>,
    update_interval: Duration,
    show_progress: bool,
}

impl DisplayManager {
    pub fn new() -> Self {
        DisplayManager {
            current_bar: None,
            update_interval: Duration::from_millis(100),
            show_progress: true,
        }
    }

    /// Disable the spinner (quiet mode, non-interactive output)
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Show welcome banner
    pub fn show_banner(&self, version: &str, model: &str) {
        let width = 64;
        println!("\n{}", "=".repeat(width).cyan());
        println!("{}", format!("  MediTriage AI {} - Clinical Triage Dashboard", version).bold().cyan());
        println!("{}", format!("  Model: {} | Mode: Demonstration", model).dimmed());
        println!("{}\n", "=".repeat(width).cyan());
    }

    /// Mock login screen header
    pub fn show_login(&self, default_id: &str) {
        println!("{}", "Secure Clinician Login".bold());
        println!(
            "{}",
            format!("Enter clinician ID (press Enter for {})", default_id).dimmed()
        );
    }

    /// Blocking disclaimer text
    pub fn show_disclaimer(&self, text: &str) {
        println!("\n{}", "IMPORTANT MEDICAL DISCLAIMER".red().bold());
        println!("{}", "-".repeat(60).red());
        println!("{}", text);
        println!(
            "\nType {} to acknowledge and continue, or {} to leave.\n",
            "/accept".green(),
            "/logout".green()
        );
    }

    /// One-line patient banner
    pub fn show_patient(&self, patient: &PatientProfile) {
        let ehr = if patient.is_ehr_connected() {
            "EHR Connected".green()
        } else {
            "EHR Not Connected".yellow()
        };
        println!(
            "{} {} | {} {} | {}",
            patient.name.bold(),
            format!("({})", patient.id).dimmed(),
            patient.age,
            patient.gender,
            ehr
        );
    }

    /// Start the spinner shown while an assessment is outstanding
    pub fn start_analysis(&mut self) -> Option<ProgressBar> {
        self.start_spinner("Analyzing clinical presentation...")
    }

    /// Start the spinner shown during EHR sync
    pub fn start_ehr_sync(&mut self) -> Option<ProgressBar> {
        self.start_spinner("Syncing EHR record...")
    }

    fn start_spinner(&mut self, message: &str) -> Option<ProgressBar> {
        self.finish_current();
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(self.update_interval);

        self.current_bar = Some(pb.clone());
        Some(pb)
    }

    pub fn finish_current(&mut self) {
        if let Some(pb) = self.current_bar.take() {
            pb.finish_and_clear();
        }
    }

    /// Print one transcript entry
    pub fn show_message(&self, message: &ChatMessage) {
        let time = message.timestamp.format("%H:%M").to_string();
        let label = match message.role {
            Role::User => "Clinician".green().bold(),
            Role::Assistant => "MediTriage".cyan().bold(),
            Role::System => "System".yellow().bold(),
        };
        println!("{} {}", label, time.dimmed());
        match message.role {
            Role::System => println!("{}\n", message.content.yellow()),
            _ => println!("{}\n", message.content),
        }
    }

    pub fn show_reminder(&self, text: &str) {
        println!(
            "{} {} {}",
            "!".yellow().bold(),
            text.yellow(),
            "(/dismiss to hide)".dimmed()
        );
    }

    pub fn show_suggestions(&self, suggestions: &[&str]) {
        if suggestions.is_empty() {
            println!("{}", "No suggestions for this draft.".dimmed());
            return;
        }
        println!("{}", "Suggested qualifiers:".bold());
        for (i, suggestion) in suggestions.iter().enumerate() {
            println!("  {}. {}", (i + 1).to_string().cyan(), suggestion);
        }
    }

    pub fn show_error(&self, error: &str) {
        println!("{} {}", "Error:".red().bold(), error.red());
    }

    pub fn show_warning(&self, warning: &str) {
        println!("{} {}", "Warning:".yellow().bold(), warning.yellow());
    }

    pub fn show_info(&self, info: &str) {
        println!("{} {}", "Info:".cyan(), info);
    }

    /// Display debug message (only if verbose)
    pub fn show_debug(&self, debug: &str, verbose: bool) {
        if verbose {
            println!("{} {}", "Debug:".dimmed(), debug.dimmed());
        }
    }

    pub fn clear_screen(&self) -> io::Result<()> {
        execute!(io::stdout(), Clear(ClearType::All), cursor::MoveTo(0, 0))
    }

    pub fn show_section(&self, title: &str) {
        println!("\n{}", title.bold().cyan());
        println!("{}", "-".repeat(60).cyan());
    }
}

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_manager_creation() {
        let manager = DisplayManager::new();
        assert!(manager.current_bar.is_none());
        assert_eq!(manager.update_interval, Duration::from_millis(100));
    }

    #[test]
    fn test_analysis_spinner_lifecycle() {
        let mut manager = DisplayManager::new();
        let pb = manager.start_analysis();
        assert!(pb.is_some());
        assert!(manager.current_bar.is_some());

        manager.finish_current();
        assert!(manager.current_bar.is_none());
    }

    #[test]
    fn test_spinner_replaced_between_stages() {
        let mut manager = DisplayManager::new();
        let _ehr = manager.start_ehr_sync();
        let _analysis = manager.start_analysis();
        assert!(manager.current_bar.is_some());
        manager.finish_current();
    }

    #[test]
    fn test_progress_disabled() {
        let mut manager = DisplayManager::new().with_progress(false);
        assert!(manager.start_analysis().is_none());
        assert!(manager.current_bar.is_none());
    }

    #[test]
    fn test_show_message_all_roles() {
        let manager = DisplayManager::new();
        manager.show_message(&ChatMessage::user("fever"));
        manager.show_message(&ChatMessage::assistant("noted"));
        manager.show_message(&ChatMessage::system("synced"));
    }
}
