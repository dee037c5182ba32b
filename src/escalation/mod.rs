//! Escalation subsystem: provider failover plus operator alerting.
//!
//! # Data Flow
//! ```text
//! Transition::Escalate (health/monitor.rs)
//!     → EscalationEvent { server, timestamp of the failover call }
//!     → failover.rs (management API, fire-and-forget)
//!     → notify.rs (alert mail; only after an accepted failover)
//! ```
//!
//! # Design Decisions
//! - Both actions are best-effort and return explicit Results; the
//!   monitor chooses to log-and-continue, nothing is thrown past a tick
//! - A notify failure never blocks or reverses the failover decision
//! - Missing alert configuration is a distinct no-op, not an error

pub mod failover;
pub mod notify;

use chrono::{DateTime, Utc};

pub use failover::{FailoverApi, FailoverError, RestFailoverClient};
pub use notify::{EmailNotifier, Notifier, NotifyError, NotifyOutcome};

/// A failover decision for one server, consumed by the escalation actions
/// and discarded after dispatch.
#[derive(Debug, Clone)]
pub struct EscalationEvent {
    /// Server the failover targets.
    pub server_name: String,
    /// When the failover call was made.
    pub timestamp: DateTime<Utc>,
}

impl EscalationEvent {
    pub fn new(server_name: impl Into<String>) -> Self {
        Self {
            server_name: server_name.into(),
            timestamp: Utc::now(),
        }
    }
}
