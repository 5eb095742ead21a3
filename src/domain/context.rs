//! Error context extension trait
//!
//! `anyhow::Context` for library code that returns [`ShroudError`]. Context
//! is prepended to the message and the result stays a typed error.
//!
//! ```rust
//! use shroud::domain::Result;
//! use shroud::domain::context::ResultExt;
//!
//! fn read_sheet(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))
//! }
//! ```

use crate::domain::errors::ShroudError;
use crate::domain::result::Result;

/// Adds `.context()` / `.with_context()` to any result whose error converts
/// into [`ShroudError`]
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static;

    /// Add lazily computed context to an error
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<ShroudError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| wrap(e.into(), context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| wrap(e.into(), f()))
    }
}

/// Keeps the variant so callers can still match on the error kind
fn wrap<C: std::fmt::Display>(err: ShroudError, context: C) -> ShroudError {
    match err {
        ShroudError::Configuration(msg) => ShroudError::Configuration(format!("{context}: {msg}")),
        ShroudError::Rules(msg) => ShroudError::Rules(format!("{context}: {msg}")),
        ShroudError::Persistence(msg) => ShroudError::Persistence(format!("{context}: {msg}")),
        ShroudError::Validation(msg) => ShroudError::Validation(format!("{context}: {msg}")),
        ShroudError::Serialization(msg) => ShroudError::Serialization(format!("{context}: {msg}")),
        ShroudError::Io(msg) => ShroudError::Io(format!("{context}: {msg}")),
        other => ShroudError::Other(format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_context_keeps_variant() {
        let result: Result<()> = Err(ShroudError::Configuration("Invalid config".to_string()));
        let err = result.context("Failed to load configuration").unwrap_err();

        assert!(matches!(err, ShroudError::Configuration(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: Failed to load configuration: Invalid config"
        );
    }

    #[test]
    fn test_context_on_io_error() {
        let result = std::fs::read_to_string("/nonexistent/shroud/rules.json");
        let err = result.context("Failed to read rulesheet").unwrap_err();

        assert!(matches!(err, ShroudError::Io(_)));
        assert!(err.to_string().contains("Failed to read rulesheet"));
    }

    #[test]
    fn test_with_context_is_lazy() {
        let called = Arc::new(AtomicBool::new(false));
        let flag = called.clone();

        let result: Result<i32> = Ok(42);
        let value = result
            .with_context(|| {
                flag.store(true, Ordering::SeqCst);
                "expensive"
            })
            .unwrap();

        assert_eq!(value, 42);
        assert!(!called.load(Ordering::SeqCst));
    }

    #[test]
    fn test_with_context_on_error() {
        let result: Result<()> = Err(ShroudError::Persistence("disk full".to_string()));
        let err = result.with_context(|| "Saving token state").unwrap_err();

        assert!(matches!(err, ShroudError::Persistence(_)));
        assert!(err.to_string().contains("Saving token state: disk full"));
    }
}
