//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!
//! Consumers:
//!     → Log aggregation (stdout, captured by the host scheduler)
//! ```
//!
//! # Design Decisions
//! - Structured logging only; probe latency and escalation outcomes are
//!   log fields, not metrics
//! - `RUST_LOG` overrides the configured level

pub mod logging;

pub use logging::init_logging;
