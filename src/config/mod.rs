//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs env overlay (SUBSCRIPTION_ID, SERVER_NAME, ...)
//!     → validation.rs (semantic checks)
//!     → MonitorConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is fixed at process start; no reload
//! - All fields have defaults so a pure-env deployment needs no file
//! - Environment variables win over file values
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    EscalationConfig, MonitorConfig, NotifyConfig, NotifySettings, ObservabilityConfig,
    ProbeConfig, ScheduleConfig, ServerConfig,
};
