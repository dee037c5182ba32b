//! Scheduled health-check-and-failover agent for a managed MySQL server.
//!
//! On every timer tick the agent opens one fresh connection against the
//! target server, classifies any failure, and lets a small state machine
//! decide between staying healthy, silently retrying on the next tick, or
//! escalating to a provider-level failover after a bounded run of
//! transient failures. An accepted failover optionally alerts an operator
//! by email.

// Core subsystems
pub mod config;
pub mod health;
pub mod probe;

// Escalation actions
pub mod escalation;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::MonitorConfig;
pub use health::Monitor;
pub use lifecycle::Shutdown;
