//! Regex-based pattern matcher
//!
//! Compiles a rule set and finds every non-overlapping match in a text.
//! Rules are evaluated longest-pattern-first; a candidate span that
//! intersects an already accepted span is discarded. Accepted spans are kept
//! in a sorted vector so each overlap test is a binary search.
//!
//! Offsets are byte offsets into the scanned `&str` and always fall on char
//! boundaries.

use crate::domain::Rule;
use fancy_regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Upper bound on backtracking steps for a single pattern search
pub const BACKTRACK_LIMIT: usize = 1_000_000;

/// A single accepted match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Source string of the rule that produced this match
    pub pattern: String,
    /// Matched literal text
    pub matched_text: String,
    /// Inclusive start offset
    pub start: usize,
    /// Exclusive end offset
    pub end: usize,
    /// Replacement label of the rule
    pub replacement: String,
}

impl Match {
    /// Length of the matched span in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True for a zero-length span
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Rule with its compiled regex
#[derive(Debug, Clone)]
pub struct CompiledRule {
    rule: Rule,
    regex: Regex,
}

impl CompiledRule {
    /// The source rule
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// The compiled regex
    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

/// Outcome of compiling one rule
#[derive(Debug, Clone)]
pub enum RuleCompilation {
    /// Pattern compiled and is ready for matching
    Compiled(CompiledRule),
    /// Pattern was rejected; the rule is dropped
    Skipped { rule: Rule, reason: String },
}

/// Runtime failure of one pattern during a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternFailure {
    /// Pattern that failed
    pub pattern: String,
    /// Error reported by the regex engine
    pub reason: String,
}

/// Matches plus per-pattern runtime failures of one scan
#[derive(Debug, Clone, Default)]
pub struct MatchSet {
    /// Accepted matches, ascending by start
    pub matches: Vec<Match>,
    /// Patterns whose remaining matches were skipped
    pub failures: Vec<PatternFailure>,
}

/// Sorted, pairwise-disjoint list of accepted `[start, end)` spans
#[derive(Debug, Default)]
pub(crate) struct AcceptedSpans {
    spans: Vec<(usize, usize)>,
}

impl AcceptedSpans {
    /// Spans are disjoint and sorted by start, so they are also sorted by
    /// end. The only candidate for intersection is the last span starting
    /// before `end`.
    pub(crate) fn overlaps(&self, start: usize, end: usize) -> bool {
        let idx = self.spans.partition_point(|&(s, _)| s < end);
        idx > 0 && self.spans[idx - 1].1 > start
    }

    pub(crate) fn insert(&mut self, start: usize, end: usize) {
        let idx = self.spans.partition_point(|&(s, _)| s < start);
        self.spans.insert(idx, (start, end));
    }
}

/// Compiled rule set
#[derive(Debug, Clone, Default)]
pub struct PatternMatcher {
    /// Longest pattern first; stable, so equal lengths keep rule order
    compiled: Vec<CompiledRule>,
    skipped: Vec<(Rule, String)>,
}

impl PatternMatcher {
    /// Build a matcher from a rule set
    ///
    /// Disabled and blank rules are ignored. Rules whose pattern does not
    /// compile are dropped with a warning; the rest stay usable.
    pub fn build(rules: &[Rule]) -> Self {
        let mut compiled = Vec::with_capacity(rules.len());
        let mut skipped = Vec::new();

        for rule in rules.iter().filter(|r| r.enabled && !r.is_blank()) {
            match Self::compile(rule) {
                RuleCompilation::Compiled(c) => compiled.push(c),
                RuleCompilation::Skipped { rule, reason } => {
                    crate::log_rule_skipped!(&rule, &reason);
                    skipped.push((rule, reason));
                }
            }
        }

        compiled.sort_by(|a, b| b.rule.precedence().cmp(&a.rule.precedence()));

        tracing::debug!(
            compiled = compiled.len(),
            skipped = skipped.len(),
            "Pattern matcher built"
        );

        Self { compiled, skipped }
    }

    /// Compile a single rule without failing the whole set
    pub fn compile(rule: &Rule) -> RuleCompilation {
        if rule.pattern.trim().is_empty() {
            return RuleCompilation::Skipped {
                rule: rule.clone(),
                reason: "pattern is empty".to_string(),
            };
        }

        match RegexBuilder::new(&rule.pattern)
            .backtrack_limit(BACKTRACK_LIMIT)
            .build()
        {
            Ok(regex) => RuleCompilation::Compiled(CompiledRule {
                rule: rule.clone(),
                regex,
            }),
            Err(e) => RuleCompilation::Skipped {
                rule: rule.clone(),
                reason: e.to_string(),
            },
        }
    }

    /// Find all non-overlapping matches, ascending by start
    pub fn find_matches(&self, text: &str) -> Vec<Match> {
        self.scan(text).matches
    }

    /// Find all non-overlapping matches and report patterns that failed at
    /// runtime
    ///
    /// A failing pattern only loses its own remaining matches.
    pub fn scan(&self, text: &str) -> MatchSet {
        let mut accepted = AcceptedSpans::default();
        let mut set = MatchSet::default();

        if text.is_empty() {
            return set;
        }

        for compiled in &self.compiled {
            for found in compiled.regex.find_iter(text) {
                let found = match found {
                    Ok(m) => m,
                    Err(e) => {
                        tracing::warn!(
                            pattern = %compiled.rule.pattern,
                            error = %e,
                            "Pattern failed during matching, skipping its remaining matches"
                        );
                        set.failures.push(PatternFailure {
                            pattern: compiled.rule.pattern.clone(),
                            reason: e.to_string(),
                        });
                        break;
                    }
                };

                let (start, end) = (found.start(), found.end());
                if start == end || accepted.overlaps(start, end) {
                    continue;
                }

                accepted.insert(start, end);
                set.matches.push(Match {
                    pattern: compiled.rule.pattern.clone(),
                    matched_text: found.as_str().to_string(),
                    start,
                    end,
                    replacement: compiled.rule.replacement.clone(),
                });
            }
        }

        set.matches.sort_by_key(|m| m.start);
        set
    }

    /// Rules in evaluation order
    pub fn compiled_rules(&self) -> impl Iterator<Item = &Rule> {
        self.compiled.iter().map(|c| &c.rule)
    }

    /// Rules dropped at build time, with the compile error
    pub fn skipped(&self) -> &[(Rule, String)] {
        &self.skipped
    }

    /// Number of usable rules
    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    /// True when no rule compiled
    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}
