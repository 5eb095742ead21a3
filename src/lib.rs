// Shroud - Reversible anonymization of sensitive text
// Copyright (c) 2025 Shroud Contributors
// Licensed under the MIT License

//! # Shroud - Reversible anonymization of sensitive text
//!
//! Shroud replaces sensitive literals (IP addresses, emails, API keys,
//! private keys, credential paths and project-specific names) with stable
//! placeholder tokens such as `IP_1` or `EMAIL_2`, and maps them back.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Matching** sensitive literals with prioritized, non-overlapping rules
//! - **Tokenizing** them through a persistent, bijective literal↔token mapping
//! - **Restoring** anonymized text, or running an action on de-anonymized
//!   text and anonymizing its output again
//! - **Validating** rule sets before they are used
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`anonymization`] - Matcher, token manager, engine, round trip, validator
//! - [`rules`] - Rule sources (built-in library, JSON rulesheet)
//! - [`domain`] - Rule type and error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shroud::anonymization::AnonymizationEngine;
//! use shroud::config::load_config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("shroud.toml")?;
//!     let engine = AnonymizationEngine::from_config(&config)?;
//!
//!     let result = engine.anonymize("ssh admin@10.0.0.5").await?;
//!     println!("{}", result.anonymized);
//!
//!     let restored = engine.round_trip().de_anonymize(&result.anonymized);
//!     assert_eq!(restored, "ssh admin@10.0.0.5");
//!     Ok(())
//! }
//! ```
//!
//! ## Round Trip
//!
//! ```rust,no_run
//! # use shroud::anonymization::AnonymizationEngine;
//! # fn example(engine: &AnonymizationEngine) -> Result<(), Box<dyn std::error::Error>> {
//! let output = engine.round_trip().run("ping IP_1", |command| {
//!     // runs with real literals, output is anonymized again
//!     Ok::<_, std::io::Error>(format!("ran: {command}"))
//! })?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Library operations return [`domain::ShroudError`]. Anonymization itself is
//! fail-closed and returns [`anonymization::AnonymizationFailure`] with no
//! text when it cannot anonymize safely.

pub mod anonymization;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
pub mod rules;
