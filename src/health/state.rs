//! Server health state machine.
//!
//! # States
//! - Healthy: probes succeed, or a failure streak is still below the bound
//! - Degraded: the transient bound was reached and failover was triggered
//!
//! # State Transitions
//! ```text
//! Healthy → Degraded: consecutive transient failures reach the bound (escalate)
//! Degraded → Healthy: any successful probe (recovery)
//! ```
//!
//! # Design Decisions
//! - Failures accumulate across ticks; there is no in-tick retry loop,
//!   which would waste the scheduling slot during an outage
//! - Escalation fires at most once per failure streak: a latch holds
//!   until the next success clears it
//! - The counter resets when escalation fires, so it is only ever nonzero
//!   before the current streak has escalated
//! - Fatal outcomes never touch status or counter

use crate::health::ConnectionOutcome;

/// Current health of the monitored server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

/// What a tick's outcome meant for the server, as decided by
/// [`ServerHealth::observe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Probe succeeded while already healthy.
    StillHealthy,
    /// Probe succeeded from Degraded; the server came back.
    Recovered,
    /// Transient failure below the bound; wait for the next tick.
    Retrying,
    /// Transient bound reached; trigger failover now.
    Escalate,
    /// Transient failure after this streak already escalated.
    StillDegraded,
    /// Fatal failure; abort the tick without mutating anything.
    FatalTick,
}

/// Health state for a single monitored server.
///
/// Owned by exactly one tick loop; ticks run to completion, so the
/// status/counter pair never sees concurrent mutation.
#[derive(Debug)]
pub struct ServerHealth {
    status: HealthStatus,
    transient_failures: u32,
    escalated: bool,
    max_transient_failures: u32,
}

impl ServerHealth {
    pub fn new(max_transient_failures: u32) -> Self {
        Self {
            status: HealthStatus::Healthy,
            transient_failures: 0,
            escalated: false,
            max_transient_failures,
        }
    }

    pub fn status(&self) -> HealthStatus {
        self.status
    }

    pub fn transient_failures(&self) -> u32 {
        self.transient_failures
    }

    /// Consume one classified probe outcome and advance the machine.
    pub fn observe(&mut self, outcome: &ConnectionOutcome) -> Transition {
        match outcome {
            ConnectionOutcome::Success => {
                let was_degraded = self.status == HealthStatus::Degraded;
                self.status = HealthStatus::Healthy;
                self.transient_failures = 0;
                self.escalated = false;
                if was_degraded {
                    Transition::Recovered
                } else {
                    Transition::StillHealthy
                }
            }
            ConnectionOutcome::TransientFailure(_) => {
                if self.escalated {
                    // Already failed over for this streak; counter stays 0.
                    return Transition::StillDegraded;
                }
                self.transient_failures += 1;
                if self.transient_failures >= self.max_transient_failures {
                    self.status = HealthStatus::Degraded;
                    self.transient_failures = 0;
                    self.escalated = true;
                    Transition::Escalate
                } else {
                    Transition::Retrying
                }
            }
            ConnectionOutcome::FatalFailure(_, _) => Transition::FatalTick,
        }
    }
}
