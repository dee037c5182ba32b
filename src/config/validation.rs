//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check required server identity fields are present
//! - Validate value ranges (intervals and timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: MonitorConfig -> Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::MonitorConfig;

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Config field the error refers to, dotted path form.
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a loaded configuration, collecting every problem found.
pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut require = |field: &str, value: &str| {
        if value.is_empty() {
            errors.push(ValidationError {
                field: field.to_string(),
                message: "must be set".to_string(),
            });
        }
    };

    require("server.subscription_id", &config.server.subscription_id);
    require("server.resource_group", &config.server.resource_group);
    require("server.server_name", &config.server.server_name);
    require("server.admin_name", &config.server.admin_name);
    require("server.admin_password", &config.server.admin_password);
    require("escalation.access_token", &config.escalation.access_token);

    if config.schedule.interval_secs == 0 {
        errors.push(ValidationError {
            field: "schedule.interval_secs".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    if config.probe.connect_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "probe.connect_timeout_secs".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    if config.probe.connect_timeout_secs >= config.schedule.interval_secs
        && config.schedule.interval_secs > 0
    {
        errors.push(ValidationError {
            field: "probe.connect_timeout_secs".to_string(),
            message: "must be shorter than the tick interval".to_string(),
        });
    }

    if config.escalation.max_transient_failures == 0 {
        errors.push(ValidationError {
            field: "escalation.max_transient_failures".to_string(),
            message: "must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
