//! Connection probing subsystem.
//!
//! # Data Flow
//! ```text
//! Monitor tick
//!     → Prober::probe() (fresh connection, bounded by connect timeout)
//!     → Ok(latency) | Err(ProbeError { code, message })
//!     → health::classify (numeric code → Transient | Fatal)
//! ```
//!
//! # Design Decisions
//! - One fresh connection per probe, never pooled: a stale pooled
//!   connection cannot prove current server reachability
//! - Driver errors are reduced to a numeric code so classification
//!   stays independent of the client library
//! - Probe latency is recorded for observability only

pub mod mysql;

use std::time::Duration;

use thiserror::Error;

pub use mysql::MySqlProber;

/// A failed connection attempt, reduced to the driver's error number.
///
/// Server-reported errors carry the server error number (e.g. 1045 for
/// access denied); failures that never reach the server carry the client
/// error number for the closest condition (see [`mysql`]).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("connection error {code}: {message}")]
pub struct ProbeError {
    /// Driver error number.
    pub code: u16,
    /// Driver error message.
    pub message: String,
}

impl ProbeError {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// One connection attempt against the target server.
#[allow(async_fn_in_trait)]
pub trait Prober {
    /// Open a fresh connection and report the elapsed latency on success.
    async fn probe(&self) -> Result<Duration, ProbeError>;
}
