//! MediTriage - clinical triage assistant (demonstration only)
//!
//! A clinician describes symptoms; a hosted LLM returns a schema-constrained
//! triage assessment that is validated before display.
//!
//! # Architecture
//!
//! - **Core**: patient/assessment types, prompt construction, provider seam
//! - **Session**: access gate, transcript, EHR sync, current assessment
//! - **Interface**: one-shot CLI, interactive dashboard, export, diagnostics

pub mod errors;
pub mod types;
pub mod fixtures;
pub mod prompt;
pub mod provider;
pub mod assessor;
pub mod session;

// Re-export commonly used types
pub use errors::{Result, TriageError};

// Interface layer
pub mod export;
pub mod report;
pub mod cli;
pub mod logging;
pub mod doctor;
pub mod repl;
