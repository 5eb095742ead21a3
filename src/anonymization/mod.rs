//! Anonymization for Shroud
//!
//! This module turns text containing sensitive literals (IPs, emails,
//! secrets, credentials, paths, project-specific names) into text carrying
//! stable placeholder tokens, and back.
//!
//! # Architecture
//!
//! - **Matcher**: rule-driven, non-overlapping, longest-pattern-first matching
//! - **Tokens**: bijective literal↔token mapping with per-label counters
//! - **Engine**: fail-closed anonymization and read-only detection
//! - **Round trip**: de-anonymize, act, re-anonymize
//! - **Validator**: static checks over a rule set
//! - **Audit**: structured logging with hashed literals
//!
//! # Usage
//!
//! ```rust,ignore
//! use shroud::anonymization::AnonymizationEngine;
//!
//! let engine = AnonymizationEngine::from_config(&config)?;
//! let result = engine.anonymize(text).await?;
//! let output = engine.round_trip().run(&result.anonymized, execute)?;
//! ```

pub mod audit;
pub mod engine;
pub mod matcher;
pub mod report;
pub mod round_trip;
pub mod tokens;
pub mod validator;

pub use engine::{
    AnonymizationEngine, AnonymizationFailure, AnonymizationResult, AnonymizationStats, Detection,
};
pub use matcher::{Match, PatternMatcher, RuleCompilation};
pub use report::DetectionReport;
pub use round_trip::{RoundTrip, RoundTripError};
pub use tokens::TokenManager;
pub use validator::{validate_rules, RuleValidationResult};
