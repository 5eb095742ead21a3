//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output on stderr (stdout carries command output only)
//! - Configurable log levels
//! - JSON log files with rotation
//!
//! Literals never reach the logs: events carry counts, rule patterns, token
//! names and hashes.
//!
//! # Example
//!
//! ```no_run
//! use shroud::logging::init_logging;
//! use shroud::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log a rule dropped because its pattern does not compile
///
/// # Example
///
/// ```no_run
/// use shroud::log_rule_skipped;
/// use shroud::domain::Rule;
///
/// let rule = Rule::new("(unclosed", "X");
/// log_rule_skipped!(&rule, "unclosed group");
/// ```
#[macro_export]
macro_rules! log_rule_skipped {
    ($rule:expr, $reason:expr) => {
        tracing::warn!(
            rule_id = %$rule.id,
            pattern = %$rule.pattern,
            reason = %$reason,
            "Skipping rule with invalid pattern"
        );
    };
}

/// Log the completion of an anonymization call
///
/// # Example
///
/// ```no_run
/// use shroud::log_anonymization_complete;
///
/// log_anonymization_complete!(12, 4, 3u64);
/// ```
#[macro_export]
macro_rules! log_anonymization_complete {
    ($matches:expr, $literals:expr, $duration_ms:expr) => {
        tracing::info!(
            matches = $matches,
            literals = $literals,
            duration_ms = $duration_ms,
            "Anonymization completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use shroud::log_error_with_context;
/// use shroud::domain::ShroudError;
///
/// let error = ShroudError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::{Rule, ShroudError};

    #[test]
    fn test_macros_expand() {
        let rule = Rule::new("(open", "X");
        crate::log_rule_skipped!(&rule, "unclosed group");
        crate::log_anonymization_complete!(3usize, 2usize, 1u64);
        crate::log_error_with_context!(
            &ShroudError::Other("boom".to_string()),
            "while testing"
        );
    }
}
