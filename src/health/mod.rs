//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Timer tick (monitor.rs):
//!     Probe the server (one fresh connection)
//!     → classify.rs (driver error number → Transient | Fatal)
//!     → ConnectionOutcome
//!     → state.rs (ServerHealth::observe → Transition)
//!     → escalation actions on Transition::Escalate
//!
//! State machine (state.rs):
//!     Healthy ←→ Degraded
//!     Failures accumulate across ticks; bound reached → failover
//! ```
//!
//! # Design Decisions
//! - Outcomes are produced fresh each tick and never stored
//! - Escalation is gated to once per failure streak
//! - A fatal outcome aborts the tick without touching state

pub mod classify;
pub mod monitor;
pub mod state;

pub use classify::{classify, FailureClass};
pub use monitor::Monitor;
pub use state::{HealthStatus, ServerHealth, Transition};

use crate::probe::ProbeError;

/// Classified result of one probe attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionOutcome {
    /// The server accepted a fresh connection.
    Success,
    /// Connection failed with an error in the transient band.
    TransientFailure(u16),
    /// Connection failed with a non-retryable error.
    FatalFailure(u16, String),
}

impl ConnectionOutcome {
    /// Classify a probe failure into an outcome.
    pub fn from_failure(err: ProbeError) -> Self {
        match classify(err.code) {
            FailureClass::Transient => ConnectionOutcome::TransientFailure(err.code),
            FailureClass::Fatal => ConnectionOutcome::FatalFailure(err.code, err.message),
        }
    }
}
