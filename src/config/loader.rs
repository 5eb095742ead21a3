//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ShroudConfig;
use crate::domain::errors::ShroudError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Configuration file used when no path is given
pub const DEFAULT_CONFIG_PATH: &str = "shroud.toml";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ShroudConfig
/// 4. Applies environment variable overrides (SHROUD_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - A referenced environment variable is not set
/// - TOML parsing fails
/// - An override has an invalid value
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use shroud::config::loader::load_config;
///
/// let config = load_config("shroud.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ShroudConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ShroudError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ShroudError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Loads `path`, or the default file when `path` is `None`
///
/// Without an explicit path, a missing `shroud.toml` means built-in defaults
/// (still subject to environment overrides). An explicit path must exist.
pub fn load_config_or_default(path: Option<&Path>) -> Result<ShroudConfig> {
    match path {
        Some(path) => load_config(path),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                load_config(&default_path)
            } else {
                tracing::info!(
                    path = DEFAULT_CONFIG_PATH,
                    "Configuration file not found, using defaults"
                );
                finish(ShroudConfig::default())
            }
        }
    }
}

/// Parses configuration from TOML text
pub fn parse_config(contents: &str) -> Result<ShroudConfig> {
    let contents = substitute_env_vars(contents)?;

    let config: ShroudConfig = toml::from_str(&contents)
        .map_err(|e| ShroudError::Configuration(format!("Failed to parse TOML: {e}")))?;

    finish(config)
}

fn finish(mut config: ShroudConfig) -> Result<ShroudConfig> {
    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        ShroudError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

fn env_var_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("placeholder regex is valid")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = env_var_regex();
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&cap[0], &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(ShroudError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    let mut result = lines.join("\n");
    if input.ends_with('\n') {
        result.push('\n');
    }
    Ok(result)
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ShroudError::Configuration(format!(
            "Invalid boolean for {name}: '{value}'"
        ))),
    }
}

fn env_bool(name: &str) -> Result<Option<bool>> {
    match std::env::var(name) {
        Ok(val) => parse_bool(name, &val).map(Some),
        Err(_) => Ok(None),
    }
}

/// Applies environment variable overrides using SHROUD_* prefix
///
/// Environment variables follow the pattern: SHROUD_<SECTION>_<KEY>
/// For example: SHROUD_RULES_RULESHEET, SHROUD_STATE_ENABLED
fn apply_env_overrides(config: &mut ShroudConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("SHROUD_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Rule overrides
    if let Ok(val) = std::env::var("SHROUD_RULES_RULESHEET") {
        config.rules.rulesheet = PathBuf::from(val);
    }
    if let Some(val) = env_bool("SHROUD_RULES_INCLUDE_BUILTIN")? {
        config.rules.include_builtin = val;
    }
    if let Some(val) = env_bool("SHROUD_RULES_STRICT_MATCHING")? {
        config.rules.strict_matching = val;
    }

    // State overrides
    if let Some(val) = env_bool("SHROUD_STATE_ENABLED")? {
        config.state.enabled = val;
    }
    if let Ok(val) = std::env::var("SHROUD_STATE_PATH") {
        config.state.path = PathBuf::from(val);
    }
    if let Some(val) = env_bool("SHROUD_STATE_RESET_ON_RULESHEET_SWITCH")? {
        config.state.reset_on_rulesheet_switch = val;
    }

    // Logging overrides
    if let Some(val) = env_bool("SHROUD_LOGGING_LOCAL_ENABLED")? {
        config.logging.local_enabled = val;
    }
    if let Ok(val) = std::env::var("SHROUD_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("SHROUD_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    // Audit overrides
    if let Some(val) = env_bool("SHROUD_AUDIT_ENABLED")? {
        config.audit.enabled = val;
    }
    if let Ok(val) = std::env::var("SHROUD_AUDIT_LOG_PATH") {
        config.audit.log_path = PathBuf::from(val);
    }
    if let Some(val) = env_bool("SHROUD_AUDIT_JSON_FORMAT")? {
        config.audit.json_format = val;
    }

    Ok(())
}
