//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Verify target once → Start the tick loop
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Tick loop exits between ticks → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: an unresolvable or unauthenticatable target at startup is
//!   fatal, before the first scheduled tick
//! - Ticks run to completion; shutdown never interrupts one mid-sequence

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{verify_target, StartupError};
