//! Per-tick orchestration and the timer loop.
//!
//! # Responsibilities
//! - Run one probe → classify → transition → act sequence per tick
//! - Skip past-due ticks entirely (no probe, no state mutation)
//! - Invoke escalation actions when the state machine decides to

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use crate::config::ScheduleConfig;
use crate::escalation::{EscalationEvent, FailoverApi, Notifier, NotifyOutcome};
use crate::health::state::{HealthStatus, ServerHealth, Transition};
use crate::health::ConnectionOutcome;
use crate::probe::Prober;

/// The scheduler entry point: owns the health state machine and the three
/// collaborators, and is the only mutator of the status/counter pair.
pub struct Monitor<P, F, N> {
    prober: P,
    failover: F,
    notifier: N,
    health: ServerHealth,
    server_name: String,
    interval: Duration,
    past_due_grace: Duration,
}

impl<P, F, N> Monitor<P, F, N>
where
    P: Prober,
    F: FailoverApi,
    N: Notifier,
{
    pub fn new(
        prober: P,
        failover: F,
        notifier: N,
        server_name: impl Into<String>,
        max_transient_failures: u32,
        schedule: &ScheduleConfig,
    ) -> Self {
        Self {
            prober,
            failover,
            notifier,
            health: ServerHealth::new(max_transient_failures),
            server_name: server_name.into(),
            interval: Duration::from_secs(schedule.interval_secs),
            past_due_grace: Duration::from_secs(schedule.past_due_grace_secs),
        }
    }

    pub fn status(&self) -> HealthStatus {
        self.health.status()
    }

    pub fn transient_failures(&self) -> u32 {
        self.health.transient_failures()
    }

    /// Run the timer loop until shutdown is signalled.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            server = %self.server_name,
            interval_secs = self.interval.as_secs(),
            "monitor starting"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                deadline = ticker.tick() => {
                    let past_due = deadline.elapsed() > self.past_due_grace;
                    self.tick(past_due).await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// One run-to-completion health check.
    pub async fn tick(&mut self, past_due: bool) {
        if past_due {
            tracing::info!(server = %self.server_name, "tick is past due, skipping");
            return;
        }

        let outcome = match self.prober.probe().await {
            Ok(_latency) => ConnectionOutcome::Success,
            Err(err) => {
                tracing::debug!(code = err.code, error = %err, "probe failed");
                ConnectionOutcome::from_failure(err)
            }
        };

        match self.health.observe(&outcome) {
            Transition::StillHealthy => {
                tracing::info!(server = %self.server_name, "server available");
            }
            Transition::Recovered => {
                tracing::info!(server = %self.server_name, "server recovered, available again");
            }
            Transition::Retrying => {
                tracing::warn!(
                    server = %self.server_name,
                    failures = self.health.transient_failures(),
                    "server unavailable, retrying next tick"
                );
            }
            Transition::Escalate => {
                tracing::warn!(
                    server = %self.server_name,
                    "server unavailable, transient bound reached"
                );
                self.escalate().await;
            }
            Transition::StillDegraded => {
                tracing::warn!(
                    server = %self.server_name,
                    "server still unavailable after failover"
                );
            }
            Transition::FatalTick => {
                if let ConnectionOutcome::FatalFailure(code, message) = &outcome {
                    tracing::error!(
                        server = %self.server_name,
                        code,
                        message = %message,
                        "fatal connection error, aborting tick"
                    );
                }
            }
        }
    }

    /// Trigger failover and, if accepted, alert the operator. Both actions
    /// are best-effort; the tick boundary contains every failure here.
    async fn escalate(&mut self) {
        // Timestamp of the failover call, not of the first failure.
        let event = EscalationEvent::new(self.server_name.clone());

        match self.failover.begin_failover(&self.server_name).await {
            Ok(()) => {
                tracing::warn!(server = %self.server_name, "failover accepted");
                match self.notifier.notify(&event).await {
                    Ok(NotifyOutcome::Sent) => {
                        tracing::info!(server = %self.server_name, "operator alerted");
                    }
                    Ok(NotifyOutcome::NotConfigured) => {
                        tracing::debug!("alerting not configured, skipping");
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "alert delivery failed");
                    }
                }
            }
            Err(err) => {
                tracing::warn!(
                    server = %self.server_name,
                    error = %err,
                    "failover interrupted"
                );
            }
        }
    }
}
