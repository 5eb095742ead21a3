//! Domain error types
//!
//! This module defines the error hierarchy for Shroud. Component errors
//! ([`AnonymizationFailure`], [`RoundTripError`]) are defined next to the
//! component that raises them and funnel into [`ShroudError`].
//!
//! None of the messages produced here ever carry a literal value: errors are
//! logged and printed, so they are treated as untrusted output.

use crate::anonymization::engine::AnonymizationFailure;
use crate::anonymization::round_trip::RoundTripError;
use thiserror::Error;

/// Main Shroud error type
#[derive(Debug, Error)]
pub enum ShroudError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Rule loading errors (unreadable or malformed rulesheet)
    #[error("Rule source error: {0}")]
    Rules(String),

    /// Token state persistence errors
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Fail-closed anonymization failure
    #[error(transparent)]
    Anonymization(#[from] AnonymizationFailure),

    /// Round-trip action failure (message already re-anonymized)
    #[error(transparent)]
    RoundTrip(#[from] RoundTripError),

    /// Rule validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for ShroudError {
    fn from(err: std::io::Error) -> Self {
        ShroudError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ShroudError {
    fn from(err: serde_json::Error) -> Self {
        ShroudError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for ShroudError {
    fn from(err: toml::de::Error) -> Self {
        ShroudError::Configuration(format!("TOML parse error: {err}"))
    }
}
