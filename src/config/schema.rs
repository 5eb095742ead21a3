//! Configuration schema types
//!
//! Every section and key has a default, so an empty file is a valid
//! configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main Shroud configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShroudConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Rule sources and matching behavior
    #[serde(default)]
    pub rules: RulesConfig,

    /// Token state persistence
    #[serde(default)]
    pub state: StateConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Audit log configuration
    #[serde(default)]
    pub audit: AuditConfig,
}

impl ShroudConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.rules.validate()?;
        self.state.validate()?;
        self.logging.validate()?;
        self.audit.validate()?;

        if self.state.enabled && self.state.path == self.rules.rulesheet {
            return Err("state.path must differ from rules.rulesheet".to_string());
        }
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Rule configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// JSON rulesheet with project rules
    #[serde(default = "default_rulesheet")]
    pub rulesheet: PathBuf,

    /// Apply the built-in rule library ahead of the rulesheet
    #[serde(default = "default_true")]
    pub include_builtin: bool,

    /// Block anonymization when a pattern fails at runtime. Turning this
    /// off lets the other rules' output through with the failure reported.
    #[serde(default = "default_true")]
    pub strict_matching: bool,
}

impl RulesConfig {
    fn validate(&self) -> Result<(), String> {
        if self.rulesheet.as_os_str().is_empty() {
            return Err("rules.rulesheet cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            rulesheet: default_rulesheet(),
            include_builtin: true,
            strict_matching: true,
        }
    }
}

/// Token state configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateConfig {
    /// Persist mappings between runs
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// JSON state file
    #[serde(default = "default_state_path")]
    pub path: PathBuf,

    /// Discard persisted mappings created under a different rulesheet
    #[serde(default = "default_true")]
    pub reset_on_rulesheet_switch: bool,
}

impl StateConfig {
    fn validate(&self) -> Result<(), String> {
        if self.enabled && self.path.as_os_str().is_empty() {
            return Err("state.path cannot be empty when state is enabled".to_string());
        }
        Ok(())
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_state_path(),
            reset_on_rulesheet_switch: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

/// Audit log configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Record every anonymization call
    #[serde(default)]
    pub enabled: bool,

    /// Audit log file
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// JSON lines instead of plain text
    #[serde(default = "default_true")]
    pub json_format: bool,
}

impl AuditConfig {
    fn validate(&self) -> Result<(), String> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            return Err("audit.log_path cannot be empty when audit is enabled".to_string());
        }
        Ok(())
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: true,
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_rulesheet() -> PathBuf {
    PathBuf::from(".shroud/rules.json")
}

fn default_state_path() -> PathBuf {
    PathBuf::from(".shroud/state.json")
}

fn default_local_path() -> String {
    ".shroud/logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from(".shroud/audit.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: ShroudConfig = toml::from_str("").unwrap();
        assert_eq!(config, ShroudConfig::default());
        assert!(config.validate().is_ok());
        assert!(config.rules.include_builtin);
        assert!(config.rules.strict_matching);
        assert!(config.state.reset_on_rulesheet_switch);
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_rotation_validation() {
        let mut config = LoggingConfig::default();
        config.local_rotation = "hourly".to_string();
        assert!(config.validate().is_ok());

        config.local_rotation = "size".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_state_path_must_differ_from_rulesheet() {
        let mut config = ShroudConfig::default();
        config.state.path = config.rules.rulesheet.clone();
        assert!(config.validate().is_err());

        config.state.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_audit_requires_path() {
        let mut config = AuditConfig {
            enabled: true,
            log_path: PathBuf::new(),
            json_format: true,
        };
        assert!(config.validate().is_err());

        config.enabled = false;
        assert!(config.validate().is_ok());
    }
}
