//! Configuration loading from disk and environment.
//!
//! A TOML file is optional; environment variables overlay whatever the file
//! provided, so a pure-env deployment (the common case for a scheduled
//! agent) needs no file at all.

use std::fs;
use std::path::Path;

use crate::config::schema::MonitorConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration: optional TOML file, then environment overlay,
/// then validation.
pub fn load_config(path: Option<&Path>) -> Result<MonitorConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => MonitorConfig::default(),
    };

    apply_env(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment-style values onto a config. Split out from
/// [`load_config`] so tests can supply their own lookup.
pub fn apply_env(config: &mut MonitorConfig, lookup: impl Fn(&str) -> Option<String>) {
    let set = |key: &str, slot: &mut String| {
        if let Some(value) = lookup(key) {
            *slot = value;
        }
    };

    set("SUBSCRIPTION_ID", &mut config.server.subscription_id);
    set("RESOURCE_GROUP", &mut config.server.resource_group);
    set("SERVER_NAME", &mut config.server.server_name);
    set("ADMIN_NAME", &mut config.server.admin_name);
    set("ADMIN_PASSWORD", &mut config.server.admin_password);
    set("MANAGEMENT_ACCESS_TOKEN", &mut config.escalation.access_token);

    if let Some(fqdn) = lookup("SERVER_FQDN") {
        config.server.fqdn = Some(fqdn);
    }
    if let Some(cs) = lookup("NOTIFY_CONNECTION_STRING") {
        config.notify.connection_string = Some(cs);
    }
    if let Some(from) = lookup("SENDER_ADDRESS") {
        config.notify.sender_address = Some(from);
    }
    if let Some(to) = lookup("RECIPIENT_ADDRESS") {
        config.notify.recipient_address = Some(to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn required_env() -> HashMap<String, String> {
        env(&[
            ("SUBSCRIPTION_ID", "0000-1111"),
            ("RESOURCE_GROUP", "prod-rg"),
            ("SERVER_NAME", "prod-db"),
            ("ADMIN_NAME", "admin"),
            ("ADMIN_PASSWORD", "hunter2"),
            ("MANAGEMENT_ACCESS_TOKEN", "token"),
        ])
    }

    #[test]
    fn env_overlays_defaults() {
        let vars = required_env();
        let mut config = MonitorConfig::default();
        apply_env(&mut config, |k| vars.get(k).cloned());

        assert_eq!(config.server.server_name, "prod-db");
        assert_eq!(config.server.admin_password, "hunter2");
        assert!(config.notify.resolved().is_none());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
subscription_id = "file-sub"
resource_group = "file-rg"
server_name = "file-db"
admin_name = "file-admin"
admin_password = "file-pass"

[schedule]
interval_secs = 30
"#
        )
        .unwrap();

        let content = fs::read_to_string(file.path()).unwrap();
        let mut config: MonitorConfig = toml::from_str(&content).unwrap();
        let vars = env(&[("SERVER_NAME", "env-db")]);
        apply_env(&mut config, |k| vars.get(k).cloned());

        assert_eq!(config.server.server_name, "env-db");
        assert_eq!(config.server.resource_group, "file-rg");
        assert_eq!(config.schedule.interval_secs, 30);
    }

    #[test]
    fn partial_notify_group_stays_unresolved() {
        let mut vars = required_env();
        vars.insert("SENDER_ADDRESS".into(), "alerts@example.com".into());

        let mut config = MonitorConfig::default();
        apply_env(&mut config, |k| vars.get(k).cloned());

        assert!(config.notify.resolved().is_none());
        assert!(config.notify.is_partial());
    }

    #[test]
    fn full_notify_group_resolves() {
        let mut vars = required_env();
        vars.insert(
            "NOTIFY_CONNECTION_STRING".into(),
            "endpoint=https://n.example.com/;accesskey=k".into(),
        );
        vars.insert("SENDER_ADDRESS".into(), "alerts@example.com".into());
        vars.insert("RECIPIENT_ADDRESS".into(), "oncall@example.com".into());

        let mut config = MonitorConfig::default();
        apply_env(&mut config, |k| vars.get(k).cloned());

        assert!(config.notify.resolved().is_some());
    }
}
