//! Tick-level behavior tests for the monitor, with scripted collaborators.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use mysql_sentinel::config::ScheduleConfig;
use mysql_sentinel::escalation::{
    EscalationEvent, FailoverApi, FailoverError, Notifier, NotifyError, NotifyOutcome,
};
use mysql_sentinel::health::{HealthStatus, Monitor};
use mysql_sentinel::probe::{ProbeError, Prober};

const MAX_TRANSIENT: u32 = 3;

#[derive(Clone)]
struct ScriptedProber {
    script: Arc<Mutex<VecDeque<Result<Duration, ProbeError>>>>,
    calls: Arc<AtomicU32>,
}

impl ScriptedProber {
    fn new(script: Vec<Result<Duration, ProbeError>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Prober for ScriptedProber {
    async fn probe(&self) -> Result<Duration, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .expect("probe called more often than scripted")
    }
}

#[derive(Clone)]
struct RecordingFailover {
    calls: Arc<AtomicU32>,
    reject: bool,
}

impl RecordingFailover {
    fn accepting() -> Self {
        Self {
            calls: Arc::new(AtomicU32::new(0)),
            reject: false,
        }
    }

    fn rejecting() -> Self {
        Self {
            calls: Arc::new(AtomicU32::new(0)),
            reject: true,
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FailoverApi for RecordingFailover {
    async fn begin_failover(&self, _server_name: &str) -> Result<(), FailoverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.reject {
            Err(FailoverError::Rejected {
                status: 409,
                body: "conflict".into(),
            })
        } else {
            Ok(())
        }
    }
}

#[derive(Clone)]
struct RecordingNotifier {
    sent: Arc<AtomicU32>,
    configured: bool,
    fail: bool,
}

impl RecordingNotifier {
    fn configured() -> Self {
        Self {
            sent: Arc::new(AtomicU32::new(0)),
            configured: true,
            fail: false,
        }
    }

    fn unconfigured() -> Self {
        Self {
            sent: Arc::new(AtomicU32::new(0)),
            configured: false,
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            sent: Arc::new(AtomicU32::new(0)),
            configured: true,
            fail: true,
        }
    }

    fn sent(&self) -> u32 {
        self.sent.load(Ordering::SeqCst)
    }
}

impl Notifier for RecordingNotifier {
    async fn notify(&self, _event: &EscalationEvent) -> Result<NotifyOutcome, NotifyError> {
        if !self.configured {
            return Ok(NotifyOutcome::NotConfigured);
        }
        if self.fail {
            return Err(NotifyError::Rejected {
                status: 500,
                body: "delivery failed".into(),
            });
        }
        self.sent.fetch_add(1, Ordering::SeqCst);
        Ok(NotifyOutcome::Sent)
    }
}

fn transient() -> Result<Duration, ProbeError> {
    Err(ProbeError::new(2003, "host unreachable"))
}

fn fatal() -> Result<Duration, ProbeError> {
    Err(ProbeError::new(1045, "access denied"))
}

fn success() -> Result<Duration, ProbeError> {
    Ok(Duration::from_millis(4))
}

fn monitor(
    script: Vec<Result<Duration, ProbeError>>,
    failover: RecordingFailover,
    notifier: RecordingNotifier,
) -> (
    Monitor<ScriptedProber, RecordingFailover, RecordingNotifier>,
    ScriptedProber,
) {
    let prober = ScriptedProber::new(script);
    let monitor = Monitor::new(
        prober.clone(),
        failover,
        notifier,
        "prod-db",
        MAX_TRANSIENT,
        &ScheduleConfig::default(),
    );
    (monitor, prober)
}

#[tokio::test]
async fn all_success_stays_healthy() {
    let failover = RecordingFailover::accepting();
    let notifier = RecordingNotifier::configured();
    let (mut monitor, _) = monitor(vec![success(); 5], failover.clone(), notifier);

    for _ in 0..5 {
        monitor.tick(false).await;
        assert_eq!(monitor.status(), HealthStatus::Healthy);
        assert_eq!(monitor.transient_failures(), 0);
    }
    assert_eq!(failover.calls(), 0);
}

#[tokio::test]
async fn short_streak_never_escalates() {
    let failover = RecordingFailover::accepting();
    let notifier = RecordingNotifier::configured();
    let (mut monitor, _) = monitor(
        vec![transient(), transient(), success()],
        failover.clone(),
        notifier,
    );

    for _ in 0..3 {
        monitor.tick(false).await;
    }
    assert_eq!(failover.calls(), 0);
    assert_eq!(monitor.status(), HealthStatus::Healthy);
    assert_eq!(monitor.transient_failures(), 0);
}

#[tokio::test]
async fn escalates_exactly_once_at_the_bound() {
    let failover = RecordingFailover::accepting();
    let notifier = RecordingNotifier::configured();
    let (mut monitor, _) = monitor(vec![transient(); 5], failover.clone(), notifier.clone());

    monitor.tick(false).await;
    monitor.tick(false).await;
    assert_eq!(failover.calls(), 0);

    // Third consecutive transient failure reaches the bound.
    monitor.tick(false).await;
    assert_eq!(failover.calls(), 1);
    assert_eq!(monitor.status(), HealthStatus::Degraded);
    assert_eq!(notifier.sent(), 1);

    // Further failures in the same streak do not fail over again.
    monitor.tick(false).await;
    monitor.tick(false).await;
    assert_eq!(failover.calls(), 1);
    assert_eq!(notifier.sent(), 1);
}

#[tokio::test]
async fn fatal_tick_leaves_state_untouched() {
    let failover = RecordingFailover::accepting();
    let notifier = RecordingNotifier::configured();
    let (mut monitor, _) = monitor(vec![transient(), fatal()], failover.clone(), notifier);

    monitor.tick(false).await;
    assert_eq!(monitor.transient_failures(), 1);

    monitor.tick(false).await;
    assert_eq!(monitor.status(), HealthStatus::Healthy);
    assert_eq!(monitor.transient_failures(), 1);
    assert_eq!(failover.calls(), 0);
}

#[tokio::test]
async fn rejected_failover_still_degrades() {
    let failover = RecordingFailover::rejecting();
    let notifier = RecordingNotifier::configured();
    let (mut monitor, _) = monitor(vec![transient(); 3], failover.clone(), notifier.clone());

    for _ in 0..3 {
        monitor.tick(false).await;
    }
    assert_eq!(failover.calls(), 1);
    assert_eq!(monitor.status(), HealthStatus::Degraded);
    // No alert without an accepted failover.
    assert_eq!(notifier.sent(), 0);
}

#[tokio::test]
async fn notify_failure_is_swallowed() {
    let failover = RecordingFailover::accepting();
    let notifier = RecordingNotifier::failing();
    let (mut monitor, _) = monitor(vec![transient(); 3], failover.clone(), notifier);

    for _ in 0..3 {
        monitor.tick(false).await;
    }
    assert_eq!(failover.calls(), 1);
    assert_eq!(monitor.status(), HealthStatus::Degraded);
}

#[tokio::test]
async fn unconfigured_notifier_does_not_block_failover() {
    let failover = RecordingFailover::accepting();
    let notifier = RecordingNotifier::unconfigured();
    let (mut monitor, _) = monitor(vec![transient(); 3], failover.clone(), notifier.clone());

    for _ in 0..3 {
        monitor.tick(false).await;
    }
    assert_eq!(failover.calls(), 1);
    assert_eq!(notifier.sent(), 0);
    assert_eq!(monitor.status(), HealthStatus::Degraded);
}

#[tokio::test]
async fn past_due_tick_is_inert() {
    let failover = RecordingFailover::accepting();
    let notifier = RecordingNotifier::configured();
    let (mut monitor, prober) = monitor(Vec::new(), failover.clone(), notifier);

    monitor.tick(true).await;

    assert_eq!(prober.calls(), 0);
    assert_eq!(failover.calls(), 0);
    assert_eq!(monitor.status(), HealthStatus::Healthy);
    assert_eq!(monitor.transient_failures(), 0);
}

#[tokio::test]
async fn recovery_after_failover_rearms_escalation() {
    let failover = RecordingFailover::accepting();
    let notifier = RecordingNotifier::configured();
    let script = vec![
        transient(),
        transient(),
        transient(), // escalates
        success(),   // recovers
        transient(),
        transient(),
        transient(), // escalates again
    ];
    let (mut monitor, _) = monitor(script, failover.clone(), notifier);

    for _ in 0..3 {
        monitor.tick(false).await;
    }
    assert_eq!(failover.calls(), 1);
    assert_eq!(monitor.status(), HealthStatus::Degraded);

    monitor.tick(false).await;
    assert_eq!(monitor.status(), HealthStatus::Healthy);

    for _ in 0..3 {
        monitor.tick(false).await;
    }
    assert_eq!(failover.calls(), 2);
    assert_eq!(monitor.status(), HealthStatus::Degraded);
}
