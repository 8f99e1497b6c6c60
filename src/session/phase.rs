//! Session access gate
//!
//! Login and disclaimer acceptance are presentation gates, not access
//! control. They are tracked as a small state machine so the dashboard
//! cannot be used before the disclaimer has been acknowledged.

use crate::errors::{Result, TriageError};
use serde::{Deserialize, Serialize};

/// Where the clinician is in the session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Login screen
    LoggedOut,

    /// Logged in, disclaimer not yet acknowledged
    AwaitingDisclaimer,

    /// Dashboard usable
    Active,
}

/// Events that move the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    Login,
    AcceptDisclaimer,
    Logout,
}

impl SessionPhase {
    /// Attempt a transition.
    ///
    /// Valid edges:
    ///
    /// ```text
    /// LoggedOut          -> AwaitingDisclaimer  (Login)
    /// AwaitingDisclaimer -> Active              (AcceptDisclaimer)
    /// Active             -> Active              (AcceptDisclaimer)
    /// any phase          -> LoggedOut           (Logout)
    /// ```
    pub fn transition(&self, event: PhaseEvent) -> Result<SessionPhase> {
        use PhaseEvent::*;
        use SessionPhase::*;

        let next = match (self, event) {
            (_, Logout) => LoggedOut,
            (LoggedOut, Login) => AwaitingDisclaimer,
            (AwaitingDisclaimer, AcceptDisclaimer) => Active,
            (Active, AcceptDisclaimer) => Active,
            (from, event) => {
                return Err(TriageError::InvalidTransition {
                    from: format!("{:?}", from),
                    to: format!("(via {:?})", event),
                    reason: format!("No valid transition from {:?} on {:?}", from, event),
                });
            }
        };

        Ok(next)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, SessionPhase::Active)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SessionPhase::LoggedOut => "Logged out",
            SessionPhase::AwaitingDisclaimer => "Awaiting disclaimer",
            SessionPhase::Active => "Active",
        }
    }
}
