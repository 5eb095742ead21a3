//! Configuration management for Shroud.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! Shroud uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `SHROUD_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use shroud::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("shroud.toml")?;
//! println!("Rulesheet: {}", config.rules.rulesheet.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`RulesConfig`] - Rulesheet, built-in rules, strict matching
//! - [`StateConfig`] - Token state persistence
//! - [`LoggingConfig`] - Local JSON log files
//! - [`AuditConfig`] - Audit log
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [rules]
//! rulesheet = ".shroud/rules.json"
//! include_builtin = true
//! strict_matching = true
//!
//! [state]
//! enabled = true
//! path = "${HOME}/.cache/shroud/state.json"
//! reset_on_rulesheet_switch = true
//!
//! [audit]
//! enabled = true
//! log_path = ".shroud/audit.log"
//! ```

pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_or_default, parse_config, DEFAULT_CONFIG_PATH};
pub use schema::{
    ApplicationConfig, AuditConfig, LoggingConfig, RulesConfig, ShroudConfig, StateConfig,
};
