//! Integration tests for configuration loading and validation
//!
//! Tests that modify environment variables hold `ENV_MUTEX` to avoid
//! interference between tests.

use shroud::config::{load_config, parse_config, ShroudConfig};
use shroud::domain::ShroudError;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("SHROUD_APPLICATION_LOG_LEVEL");
    std::env::remove_var("SHROUD_RULES_RULESHEET");
    std::env::remove_var("SHROUD_RULES_STRICT_MATCHING");
    std::env::remove_var("SHROUD_STATE_ENABLED");
    std::env::remove_var("SHROUD_AUDIT_ENABLED");
    std::env::remove_var("TEST_SHROUD_PROJECT_DIR");
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[application]
log_level = "debug"

[rules]
rulesheet = "project/rules.json"
include_builtin = false
strict_matching = false

[state]
enabled = true
path = "project/state.json"
reset_on_rulesheet_switch = false

[logging]
local_enabled = true
local_path = "project/logs"
local_rotation = "hourly"

[audit]
enabled = true
log_path = "project/audit.log"
json_format = false
"#,
    );

    let config = load_config(temp_file.path()).unwrap();
    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.rules.rulesheet, PathBuf::from("project/rules.json"));
    assert!(!config.rules.include_builtin);
    assert!(!config.rules.strict_matching);
    assert_eq!(config.state.path, PathBuf::from("project/state.json"));
    assert!(!config.state.reset_on_rulesheet_switch);
    assert_eq!(config.logging.local_rotation, "hourly");
    assert!(config.audit.enabled);
    assert!(!config.audit.json_format);
}

#[test]
fn test_empty_config_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let config = parse_config("").unwrap();
    assert_eq!(config, ShroudConfig::default());
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TEST_SHROUD_PROJECT_DIR", "/srv/project");

    let config = parse_config(
        r#"
[rules]
rulesheet = "${TEST_SHROUD_PROJECT_DIR}/rules.json"
"#,
    )
    .unwrap();
    assert_eq!(config.rules.rulesheet, PathBuf::from("/srv/project/rules.json"));

    cleanup_env_vars();
}

#[test]
fn test_missing_env_var_fails() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let result = parse_config("[rules]\nrulesheet = \"${TEST_SHROUD_PROJECT_DIR}/rules.json\"\n");
    match result {
        Err(ShroudError::Configuration(msg)) => {
            assert!(msg.contains("TEST_SHROUD_PROJECT_DIR"));
        }
        other => panic!("expected configuration error, got {other:?}"),
    }
}

#[test]
fn test_env_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("SHROUD_APPLICATION_LOG_LEVEL", "warn");
    std::env::set_var("SHROUD_RULES_RULESHEET", "override/rules.json");
    std::env::set_var("SHROUD_RULES_STRICT_MATCHING", "false");
    std::env::set_var("SHROUD_AUDIT_ENABLED", "1");

    let config = parse_config("[application]\nlog_level = \"info\"\n").unwrap();
    assert_eq!(config.application.log_level, "warn");
    assert_eq!(config.rules.rulesheet, PathBuf::from("override/rules.json"));
    assert!(!config.rules.strict_matching);
    assert!(config.audit.enabled);

    cleanup_env_vars();
}

#[test]
fn test_invalid_bool_override_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("SHROUD_STATE_ENABLED", "sometimes");

    let result = parse_config("");
    assert!(matches!(result, Err(ShroudError::Configuration(_))));

    cleanup_env_vars();
}

#[test]
fn test_invalid_values_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    assert!(parse_config("[logging]\nlocal_rotation = \"weekly\"\n").is_err());
    assert!(parse_config("[application]\nlog_level = \"verbose\"\n").is_err());
    assert!(parse_config(
        "[rules]\nrulesheet = \"same.json\"\n[state]\npath = \"same.json\"\n"
    )
    .is_err());
    assert!(parse_config("[rules]\ninclude_builtin = \"yes\"\n").is_err());
}
