//! Interactive triage dashboard
//!
//! Drives a [`TriageSession`] from the terminal: mock login, the blocking
//! disclaimer, then the chat loop with slash commands.

pub mod commands;
pub mod display;
pub mod input;

use anyhow::Result;
use chrono::Utc;
use std::path::{Path, PathBuf};

use crate::export::export_assessment;
use crate::fixtures;
use crate::prompt::Severity;
use crate::report;
use crate::session::{append_suggestion, suggestions_for, EhrSync, SendOutcome, SessionPhase, TriageSession};
use crate::repl::commands::{is_command, Command};
pub use crate::repl::display::DisplayManager;
use crate::repl::input::{InputHandler, InputLine};

const LOGIN_PROMPT: &str = "clinician id> ";

/// Dashboard coordinator
pub struct ReplSession {
    input_handler: InputHandler,
    display: DisplayManager,
    session: TriageSession,
    export_dir: PathBuf,
    default_clinician: String,
    /// Transcript entries already printed
    shown: usize,
    verbose: bool,
}

impl ReplSession {
    pub fn new(session: TriageSession, config: &ReplConfig) -> Result<Self> {
        let input_handler = match &config.history_file {
            Some(path) => InputHandler::with_history(path.clone())?,
            None => InputHandler::new()?,
        };

        Ok(ReplSession {
            input_handler,
            display: DisplayManager::new().with_progress(config.show_progress),
            session,
            export_dir: config.export_dir.clone(),
            default_clinician: config.clinician_id.clone(),
            shown: 0,
            verbose: config.verbose,
        })
    }

    pub fn show_welcome(&self, version: &str) {
        self.display.show_banner(version, self.session.model());
    }

    /// Main loop; returns when the clinician exits
    pub async fn run(&mut self) -> Result<()> {
        loop {
            if self.session.phase() == SessionPhase::LoggedOut && !self.login()? {
                break;
            }

            let line = match self.input_handler.read_line()? {
                InputLine::Text(line) => line,
                InputLine::Interrupted => {
                    self.display.show_info("Use /exit to leave the dashboard.");
                    continue;
                }
                InputLine::Eof => break,
            };

            match self.handle_input(&line).await {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => self.display.show_error(&e.to_string()),
            }
        }

        self.save()?;
        println!("Session closed.");
        Ok(())
    }

    /// Mock login screen. Returns false when the clinician leaves instead.
    fn login(&mut self) -> Result<bool> {
        self.display.show_login(&self.default_clinician);
        let id = match self.input_handler.read_with_prompt(LOGIN_PROMPT, false)? {
            InputLine::Text(id) if id.is_empty() => self.default_clinician.clone(),
            InputLine::Text(id) => id,
            InputLine::Interrupted | InputLine::Eof => return Ok(false),
        };

        self.session.login(&id)?;
        self.display.show_disclaimer(fixtures::DISCLAIMER);
        // The disclaimer is already on screen; skip its transcript copy
        self.shown = 1;
        Ok(true)
    }

    /// Handle one line of input
    ///
    /// Returns true if the dashboard should keep running
    pub async fn handle_input(&mut self, input: &str) -> Result<bool> {
        if input.trim().is_empty() {
            return Ok(true);
        }

        if is_command(input) {
            let command = commands::parse(input);
            return self.execute(command).await;
        }

        match self.session.phase() {
            SessionPhase::Active => {
                self.send(input).await?;
            }
            SessionPhase::AwaitingDisclaimer => {
                self.display
                    .show_warning("Acknowledge the disclaimer with /accept before entering symptoms.");
            }
            SessionPhase::LoggedOut => {
                self.display.show_warning("Login required.");
            }
        }
        Ok(true)
    }

    async fn send(&mut self, input: &str) -> Result<()> {
        let spinner = self.display.start_analysis();
        let outcome = self.session.send(input).await;
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
        self.display.finish_current();

        match outcome? {
            SendOutcome::Ignored => return Ok(()),
            SendOutcome::Assessed => {
                self.show_new_messages();
                print!("{}", report::render_panel(self.session.assessment()));
            }
            SendOutcome::Failed(e) => {
                self.display.show_debug(&e.to_string(), self.verbose);
                self.show_new_messages();
            }
        }

        if self.session.reminder_visible() {
            self.display.show_reminder(fixtures::DISCLAIMER_REMINDER);
        }
        Ok(())
    }

    async fn execute(&mut self, command: Command) -> Result<bool> {
        // Only these work before the disclaimer is accepted
        let gated = !matches!(
            command,
            Command::Help | Command::Accept | Command::Logout | Command::Clear | Command::Exit | Command::Status
        );
        if gated && !self.session.phase().is_active() {
            self.display
                .show_warning("Acknowledge the disclaimer with /accept first.");
            return Ok(true);
        }

        match command {
            Command::Help => self.show_help(),
            Command::Accept => {
                if self.session.phase().is_active() {
                    self.display.show_info("Disclaimer already accepted.");
                } else {
                    self.session.accept_disclaimer()?;
                    self.display.show_patient(self.session.patient());
                    println!();
                    self.show_new_messages();
                }
            }
            Command::Ehr => {
                if self.session.patient().is_ehr_connected() {
                    print!("{}", report::render_records(self.session.patient()));
                } else {
                    let spinner = self.display.start_ehr_sync();
                    let result = self.session.connect_ehr().await;
                    if let Some(pb) = spinner {
                        pb.finish_and_clear();
                    }
                    self.display.finish_current();
                    if result? == EhrSync::Synced {
                        self.show_new_messages();
                    }
                }
            }
            Command::Records => print!("{}", report::render_records(self.session.patient())),
            Command::Severity { level: Some(level) } => match self.session.select_severity(level) {
                Some(level) => self
                    .display
                    .show_info(&format!("Next message will be tagged (Severity: {}).", level)),
                None => self.display.show_info("Severity selection cleared."),
            },
            Command::Severity { level: None } => {
                let levels: Vec<&str> = Severity::ALL.iter().map(|s| s.as_str()).collect();
                let current = self
                    .session
                    .severity()
                    .map(|s| s.as_str())
                    .unwrap_or("none");
                self.display.show_info(&format!(
                    "Levels: {} | Selected: {}",
                    levels.join(", "),
                    current
                ));
            }
            Command::ClearSeverity => {
                self.session.clear_severity();
                self.display.show_info("Severity selection cleared.");
            }
            Command::Suggest { text } => {
                let suggestions = suggestions_for(&text);
                self.display.show_suggestions(&suggestions);
                if let Some(first) = suggestions.first() {
                    self.display
                        .show_info(&format!("e.g. {}", append_suggestion(&text, first)));
                }
            }
            Command::Assessment => print!("{}", report::render_panel(self.session.assessment())),
            Command::Print => match self.session.assessment() {
                Some(assessment) => {
                    println!("{}", report::render_print(self.session.patient(), assessment, Utc::now()))
                }
                None => self.display.show_warning("No assessment to print yet."),
            },
            Command::Export { dir } => {
                let dir = dir.unwrap_or_else(|| self.export_dir.clone());
                self.export_to(&dir);
            }
            Command::History { limit } => self.show_history(limit),
            Command::Patient => self.display.show_patient(self.session.patient()),
            Command::Status => self.show_status(),
            Command::Dismiss => self.session.dismiss_reminder(),
            Command::Logout => {
                self.session.logout()?;
                self.shown = 0;
                self.display.show_info("Logged out. Session data cleared.");
            }
            Command::Clear => self.display.clear_screen()?,
            Command::Exit => return Ok(false),
            Command::Unknown { input } => {
                self.display
                    .show_error(&format!("Unknown command: {}. Type /help for commands.", input));
            }
        }
        Ok(true)
    }

    fn export_to(&self, dir: &Path) {
        match export_assessment(dir, self.session.patient(), self.session.assessment()) {
            Ok(path) => self
                .display
                .show_info(&format!("Assessment exported to {}", path.display())),
            Err(e) => self.display.show_error(&e.to_string()),
        }
    }

    fn show_new_messages(&mut self) {
        let messages = self.session.transcript().messages();
        for message in messages.iter().skip(self.shown) {
            self.display.show_message(message);
        }
        self.shown = messages.len();
    }

    fn show_history(&self, limit: Option<usize>) {
        let messages = self.session.transcript().messages();
        let limit = limit.unwrap_or(10);
        self.display.show_section("Conversation History");
        for message in messages.iter().skip(messages.len().saturating_sub(limit)) {
            self.display.show_message(message);
        }
    }

    fn show_status(&self) {
        self.display.show_section("Session Status");
        println!("  Phase:      {}", self.session.phase().display_name());
        println!("  Clinician:  {}", self.session.clinician_id().unwrap_or("-"));
        println!("  Model:      {}", self.session.model());
        println!("  Messages:   {}", self.session.transcript().len());
        println!("  Sent:       {}", self.session.send_count());
        let assessed = self
            .session
            .assessed_at()
            .map(|at| at.format("%H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "none".to_string());
        println!("  Assessment: {}", assessed);
    }

    fn show_help(&self) {
        self.display.show_section("Dashboard Commands");
        for (usage, description) in commands::HELP {
            println!("  {:<24} {}", usage, description);
        }
        println!("\nAnything else is sent as a symptom description.");
    }

    pub fn session(&self) -> &TriageSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut TriageSession {
        &mut self.session
    }

    pub fn save(&mut self) -> Result<()> {
        self.input_handler.save_history()
    }
}

/// Dashboard settings resolved from the config file and flags
#[derive(Debug, Clone)]
pub struct ReplConfig {
    pub history_file: Option<PathBuf>,
    pub export_dir: PathBuf,
    pub clinician_id: String,
    pub show_progress: bool,
    pub verbose: bool,
}

impl Default for ReplConfig {
    fn default() -> Self {
        ReplConfig {
            history_file: None,
            export_dir: PathBuf::from("."),
            clinician_id: fixtures::DEMO_CLINICIAN_ID.to_string(),
            show_progress: true,
            verbose: false,
        }
    }
}
