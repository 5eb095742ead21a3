//! Anonymization engine
//!
//! This module provides the [`AnonymizationEngine`], which turns raw text into
//! anonymized text by driving the [`PatternMatcher`] and the
//! [`TokenManager`].
//!
//! # Pipeline
//!
//! For every call the engine:
//! 1. reloads the rules from its [`RuleSource`] and rebuilds the matcher
//! 2. finds all non-overlapping matches
//! 3. drops matches that are already issued tokens
//! 4. replaces each match with its token, last match first
//! 5. counts matches per rule pattern
//!
//! Splicing runs in descending `start` order. Matches are disjoint, so
//! replacing `[start, end)` only shifts text to the right of every match not
//! yet processed, and their offsets stay valid whatever the token length.
//!
//! # Failure policy
//!
//! Anonymization is fail-closed. Any failure returns an
//! [`AnonymizationFailure`] and no text at all; callers must not fall back to
//! the original.
//!
//! # Examples
//!
//! ```
//! use shroud::anonymization::AnonymizationEngine;
//! use shroud::anonymization::tokens::TokenManager;
//! use shroud::domain::Rule;
//! use shroud::rules::StaticRules;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let rules = StaticRules::new(vec![Rule::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b", "IP_{index}")]);
//! let engine = AnonymizationEngine::new(Arc::new(rules), Arc::new(TokenManager::in_memory()));
//!
//! let result = engine.anonymize("connect to 10.0.0.5 and 10.0.0.5 again").await?;
//! assert_eq!(result.anonymized, "connect to IP_1 and IP_1 again");
//! assert_eq!(result.stats.total_matches, 2);
//! # Ok(())
//! # }
//! ```

use crate::anonymization::{
    audit::AuditLogger,
    matcher::{Match, PatternFailure, PatternMatcher},
    round_trip::RoundTrip,
    tokens::{JsonFileStore, MappingStore, MemoryStore, TokenManager},
};
use crate::config::ShroudConfig;
use crate::domain::{Result, Rule};
use crate::rules::{BuiltinRules, CombinedSource, RuleSource, RulesheetSource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Why an anonymization call was blocked
///
/// There is no partial-success variant: a failed call yields no text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnonymizationFailure {
    /// Rules could not be loaded
    #[error("Anonymization blocked: rules could not be loaded ({0})")]
    RuleSource(String),

    /// A pattern failed at runtime
    #[error("Anonymization blocked: pattern \"{pattern}\" failed ({reason})")]
    PatternFailed { pattern: String, reason: String },

    /// A match range does not fit the text
    #[error("Anonymization blocked: invalid splice range {start}..{end} for text of {len} bytes")]
    InvalidSplice { start: usize, end: usize, len: usize },
}

/// Match statistics of one call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnonymizationStats {
    /// Replaced matches, repeated literals included
    pub total_matches: usize,
    /// Rule pattern string -> replaced matches
    pub per_pattern_counts: BTreeMap<String, usize>,
}

/// Outcome of a successful anonymization call
///
/// Holds the original text and the literals; it is not serializable on
/// purpose. Use [`AnonymizationResult::summary`] for output.
#[derive(Debug, Clone)]
pub struct AnonymizationResult {
    pub original: String,
    pub anonymized: String,
    /// literal -> token for the literals seen in this call only
    pub mappings: BTreeMap<String, String>,
    pub stats: AnonymizationStats,
    /// Patterns that failed at runtime; always empty unless strict
    /// matching was turned off
    pub failed_patterns: Vec<PatternFailure>,
    pub timestamp: DateTime<Utc>,
    pub processing_time_ms: u64,
}

impl AnonymizationResult {
    /// Literal-free view of the result
    pub fn summary(&self) -> AnonymizationSummary {
        let mut tokens: Vec<String> = self.mappings.values().cloned().collect();
        tokens.sort();
        tokens.dedup();

        AnonymizationSummary {
            anonymized: self.anonymized.clone(),
            stats: self.stats.clone(),
            tokens,
            failed_patterns: self.failed_patterns.clone(),
            timestamp: self.timestamp,
            processing_time_ms: self.processing_time_ms,
        }
    }
}

/// Serializable, literal-free summary of an anonymization call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationSummary {
    pub anonymized: String,
    pub stats: AnonymizationStats,
    pub tokens: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_patterns: Vec<PatternFailure>,
    pub timestamp: DateTime<Utc>,
    pub processing_time_ms: u64,
}

/// Detection output with the rule diagnostics of the scan
#[derive(Debug, Clone, Default)]
pub struct Detection {
    /// Matches `anonymize` would replace, ascending by start
    pub matches: Vec<Match>,
    /// Rules dropped because their pattern does not compile
    pub skipped_rules: Vec<(Rule, String)>,
    /// Patterns that failed at runtime
    pub failed_patterns: Vec<PatternFailure>,
}

/// Anonymization engine
///
/// Cheap to share behind an `Arc`: the only mutable state is the token
/// manager, which synchronizes itself.
pub struct AnonymizationEngine {
    rules: Arc<dyn RuleSource>,
    tokens: Arc<TokenManager>,
    strict_matching: bool,
    audit_logger: Option<AuditLogger>,
}

impl AnonymizationEngine {
    /// Create an engine over a rule source and a token manager
    pub fn new(rules: Arc<dyn RuleSource>, tokens: Arc<TokenManager>) -> Self {
        Self {
            rules,
            tokens,
            strict_matching: true,
            audit_logger: None,
        }
    }

    /// Fail the call when a pattern errors at runtime (the default)
    ///
    /// With `false` the call succeeds on the remaining rules and the failure
    /// is reported in [`AnonymizationResult::failed_patterns`]; text the
    /// failed pattern would have matched is left as is.
    pub fn with_strict_matching(mut self, strict: bool) -> Self {
        self.strict_matching = strict;
        self
    }

    /// Record every successful call in an audit log
    pub fn with_audit_logger(mut self, logger: AuditLogger) -> Self {
        self.audit_logger = Some(logger);
        self
    }

    /// Build an engine from configuration
    ///
    /// Wires built-in rules (if enabled) ahead of the rulesheet, a JSON or
    /// in-memory token store, and the audit logger. With
    /// `state.reset_on_rulesheet_switch`, persisted mappings that belong to a
    /// different rulesheet are discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the built-in library, the persisted token state or
    /// the audit log directory cannot be loaded or created.
    pub fn from_config(config: &ShroudConfig) -> Result<Self> {
        let mut sources = CombinedSource::new();
        if config.rules.include_builtin {
            sources = sources.with(Arc::new(BuiltinRules::load()?));
        }
        sources = sources.with(Arc::new(RulesheetSource::new(&config.rules.rulesheet)));

        let store: Arc<dyn MappingStore> = if config.state.enabled {
            Arc::new(JsonFileStore::new(&config.state.path))
        } else {
            Arc::new(MemoryStore::new())
        };
        let tokens = TokenManager::new(store)?;

        if config.state.reset_on_rulesheet_switch {
            tokens.bind_scope(&config.rules.rulesheet.display().to_string());
        }

        let mut engine = Self::new(Arc::new(sources), Arc::new(tokens))
            .with_strict_matching(config.rules.strict_matching);

        if config.audit.enabled {
            engine = engine.with_audit_logger(AuditLogger::new(
                config.audit.log_path.clone(),
                config.audit.json_format,
                true,
            )?);
        }

        tracing::info!(
            rules = %engine.rules.describe(),
            strict_matching = engine.strict_matching,
            audit = engine.audit_logger.is_some(),
            "Anonymization engine initialized"
        );

        Ok(engine)
    }

    pub fn token_manager(&self) -> &Arc<TokenManager> {
        &self.tokens
    }

    pub fn rule_source(&self) -> &Arc<dyn RuleSource> {
        &self.rules
    }

    /// Round-trip protocol over this engine's mappings
    pub fn round_trip(&self) -> RoundTrip<'_> {
        RoundTrip::new(&self.tokens)
    }

    async fn build_matcher(&self) -> std::result::Result<PatternMatcher, AnonymizationFailure> {
        let rules = self.rules.load_rules().await.map_err(|e| {
            tracing::error!(source = %self.rules.describe(), error = %e, "Rule loading failed");
            AnonymizationFailure::RuleSource(e.to_string())
        })?;
        Ok(PatternMatcher::build(&rules))
    }

    /// Anonymize `text`
    ///
    /// # Errors
    ///
    /// Returns [`AnonymizationFailure`] when rules cannot be loaded, when a
    /// pattern fails at runtime (unless strict matching is off), or when a match range is not a
    /// valid splice. No partial text is ever returned.
    pub async fn anonymize(
        &self,
        text: &str,
    ) -> std::result::Result<AnonymizationResult, AnonymizationFailure> {
        let start_time = Instant::now();
        let matcher = self.build_matcher().await?;
        let scan = matcher.scan(text);

        if self.strict_matching {
            if let Some(failure) = scan.failures.first() {
                return Err(AnonymizationFailure::PatternFailed {
                    pattern: failure.pattern.clone(),
                    reason: failure.reason.clone(),
                });
            }
        }

        let mut matches = self.without_known_tokens(scan.matches);
        for m in &matches {
            check_splice(text, m)?;
        }
        matches.sort_by(|a, b| b.start.cmp(&a.start));

        let mut anonymized = text.to_string();
        let mut mappings = BTreeMap::new();
        let mut stats = AnonymizationStats::default();

        for m in &matches {
            let token = self.tokens.issue_token(&m.replacement, &m.matched_text);
            anonymized.replace_range(m.start..m.end, &token);
            mappings.insert(m.matched_text.clone(), token);
            *stats.per_pattern_counts.entry(m.pattern.clone()).or_insert(0) += 1;
            stats.total_matches += 1;
        }

        let result = AnonymizationResult {
            original: text.to_string(),
            anonymized,
            mappings,
            stats,
            failed_patterns: scan.failures,
            timestamp: Utc::now(),
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        };

        crate::log_anonymization_complete!(
            result.stats.total_matches,
            result.mappings.len(),
            result.processing_time_ms
        );

        if let Some(ref logger) = self.audit_logger {
            if let Err(e) = logger.log_anonymization(&result) {
                tracing::warn!(error = %e, "Failed to write audit entry");
            }
        }

        Ok(result)
    }

    /// Matches `anonymize` would replace, without touching token state
    ///
    /// # Errors
    ///
    /// Returns [`AnonymizationFailure::RuleSource`] when rules cannot be
    /// loaded.
    pub async fn detect_patterns(
        &self,
        text: &str,
    ) -> std::result::Result<Vec<Match>, AnonymizationFailure> {
        Ok(self.detect(text).await?.matches)
    }

    /// Like [`detect_patterns`](Self::detect_patterns), with rule
    /// diagnostics
    pub async fn detect(&self, text: &str) -> std::result::Result<Detection, AnonymizationFailure> {
        let matcher = self.build_matcher().await?;
        let scan = matcher.scan(text);

        Ok(Detection {
            matches: self.without_known_tokens(scan.matches),
            skipped_rules: matcher.skipped().to_vec(),
            failed_patterns: scan.failures,
        })
    }

    /// Issued tokens are never anonymized again
    fn without_known_tokens(&self, matches: Vec<Match>) -> Vec<Match> {
        matches
            .into_iter()
            .filter(|m| !self.tokens.is_token(&m.matched_text))
            .collect()
    }
}

impl std::fmt::Debug for AnonymizationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnonymizationEngine")
            .field("rules", &self.rules.describe())
            .field("tokens", &self.tokens)
            .field("strict_matching", &self.strict_matching)
            .field("audit", &self.audit_logger.is_some())
            .finish()
    }
}

fn check_splice(text: &str, m: &Match) -> std::result::Result<(), AnonymizationFailure> {
    let valid = m.start < m.end
        && m.end <= text.len()
        && text.is_char_boundary(m.start)
        && text.is_char_boundary(m.end)
        && text[m.start..m.end] == m.matched_text;

    if valid {
        Ok(())
    } else {
        Err(AnonymizationFailure::InvalidSplice {
            start: m.start,
            end: m.end,
            len: text.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ShroudError;
    use crate::rules::StaticRules;
    use async_trait::async_trait;

    const IPV4: &str = r"\b(?:\d{1,3}\.){3}\d{1,3}\b";

    struct BrokenSource;

    #[async_trait]
    impl RuleSource for BrokenSource {
        async fn load_rules(&self) -> Result<Vec<Rule>> {
            Err(ShroudError::Rules("rulesheet is not valid JSON".to_string()))
        }

        fn describe(&self) -> String {
            "broken".to_string()
        }
    }

    fn engine(rules: Vec<Rule>) -> AnonymizationEngine {
        AnonymizationEngine::new(
            Arc::new(StaticRules::new(rules)),
            Arc::new(TokenManager::in_memory()),
        )
    }

    fn sample_match(start: usize, end: usize, text: &str) -> Match {
        Match {
            pattern: "x".to_string(),
            matched_text: text.to_string(),
            start,
            end,
            replacement: "X".to_string(),
        }
    }

    #[tokio::test]
    async fn test_repeated_literal_single_token() {
        let engine = engine(vec![Rule::new(IPV4, "IP_{index}")]);
        let result = engine
            .anonymize("connect to 10.0.0.5 and 10.0.0.5 again")
            .await
            .unwrap();

        assert_eq!(result.anonymized, "connect to IP_1 and IP_1 again");
        assert_eq!(result.stats.total_matches, 2);
        assert_eq!(result.mappings.len(), 1);
        assert_eq!(result.stats.per_pattern_counts.get(IPV4), Some(&2));
    }

    #[tokio::test]
    async fn test_token_length_differs_from_literal() {
        let engine = engine(vec![
            Rule::new(IPV4, "ip"),
            Rule::new(r"\bsecret-[a-z]+\b", "S"),
        ]);
        let result = engine
            .anonymize("a 192.168.100.200 b secret-abc c 10.1.1.1")
            .await
            .unwrap();

        assert_eq!(result.anonymized, "a IP_2 b S c IP_1");
    }

    #[tokio::test]
    async fn test_rule_source_failure_is_fatal() {
        let engine = AnonymizationEngine::new(
            Arc::new(BrokenSource),
            Arc::new(TokenManager::in_memory()),
        );

        let err = engine.anonymize("10.0.0.5").await.unwrap_err();
        assert!(matches!(err, AnonymizationFailure::RuleSource(_)));
        assert!(engine.token_manager().is_empty());
    }

    #[tokio::test]
    async fn test_already_anonymized_text_is_stable() {
        let engine = engine(vec![
            Rule::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b", "email"),
        ]);

        let first = engine.anonymize("mail bob@corp.io").await.unwrap();
        assert_eq!(first.anonymized, "mail USER_A@domain.tld");

        let second = engine.anonymize(&first.anonymized).await.unwrap();
        assert_eq!(second.anonymized, first.anonymized);
        assert_eq!(second.stats.total_matches, 0);
        assert_eq!(engine.token_manager().len(), 1);
    }

    #[tokio::test]
    async fn test_detect_does_not_mutate_tokens() {
        let engine = engine(vec![Rule::new(IPV4, "ip")]);
        let text = "hosts 10.0.0.1 10.0.0.2";

        let detected = engine.detect_patterns(text).await.unwrap();
        assert_eq!(detected.len(), 2);
        assert!(engine.token_manager().is_empty());
        assert_eq!(engine.token_manager().counter("ip"), 0);

        let result = engine.anonymize(text).await.unwrap();
        assert_eq!(result.stats.total_matches, detected.len());
    }

    #[tokio::test]
    async fn test_detect_reports_skipped_rules() {
        let engine = engine(vec![Rule::new("(open", "X"), Rule::new(IPV4, "ip")]);
        let detection = engine.detect("10.0.0.1").await.unwrap();

        assert_eq!(detection.matches.len(), 1);
        assert_eq!(detection.skipped_rules.len(), 1);
    }

    #[tokio::test]
    async fn test_summary_has_no_literals() {
        let engine = engine(vec![Rule::new(IPV4, "ip")]);
        let result = engine.anonymize("ping 10.0.0.5").await.unwrap();

        let json = serde_json::to_string(&result.summary()).unwrap();
        assert!(json.contains("IP_1"));
        assert!(!json.contains("10.0.0.5"));
    }

    #[test]
    fn test_check_splice() {
        let text = "aé b";
        assert!(check_splice(text, &sample_match(0, 3, "aé")).is_ok());
        assert!(check_splice(text, &sample_match(0, 2, "a\u{00}")).is_err());
        assert!(check_splice(text, &sample_match(4, 9, "b")).is_err());
        assert!(check_splice(text, &sample_match(1, 1, "")).is_err());
        assert!(check_splice(text, &sample_match(4, 5, "c")).is_err());
    }
}
