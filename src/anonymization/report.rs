//! Detection reporting
//!
//! Summarizes a detection pass (no token state touched) for preview: match
//! counts per replacement label, a few masked samples, and warnings about
//! rules that were skipped or failed.

use crate::anonymization::engine::Detection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maximum samples kept in a report
const MAX_SAMPLES: usize = 20;

/// Leading characters of a literal left visible in samples
const VISIBLE_PREFIX: usize = 2;

/// Detection report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionReport {
    /// Size of the scanned text in bytes
    pub text_bytes: usize,

    /// Total matches
    pub total_matches: usize,

    /// Matches per replacement label
    pub matches_by_label: BTreeMap<String, usize>,

    /// Masked samples, in text order
    pub samples: Vec<DetectionSample>,

    /// Skipped or failing rules
    pub warnings: Vec<String>,
}

/// One detected span
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionSample {
    /// Masked literal
    pub masked: String,
    /// Replacement label of the rule
    pub replacement: String,
    /// Rule pattern
    pub pattern: String,
    /// Byte offsets `[start, end)`
    pub start: usize,
    pub end: usize,
}

impl DetectionReport {
    /// Build a report for a scan of `text_bytes` bytes
    pub fn from_detection(detection: &Detection, text_bytes: usize) -> Self {
        let mut report = Self {
            text_bytes,
            total_matches: detection.matches.len(),
            ..Self::default()
        };

        for m in &detection.matches {
            *report
                .matches_by_label
                .entry(m.replacement.clone())
                .or_insert(0) += 1;
        }

        report.samples = detection
            .matches
            .iter()
            .take(MAX_SAMPLES)
            .map(|m| DetectionSample {
                masked: mask_literal(&m.matched_text),
                replacement: m.replacement.clone(),
                pattern: m.pattern.clone(),
                start: m.start,
                end: m.end,
            })
            .collect();

        for (rule, reason) in &detection.skipped_rules {
            report.add_warning(format!(
                "Rule {} skipped: invalid pattern \"{}\" ({})",
                rule.id, rule.pattern, reason
            ));
        }
        for failure in &detection.failed_patterns {
            report.add_warning(format!(
                "Pattern \"{}\" failed during matching: {}",
                failure.pattern, failure.reason
            ));
        }

        report
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Format report for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                      DETECTION REPORT                         \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str("📊 SUMMARY\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!("  Text Size:          {} bytes\n", self.text_bytes));
        output.push_str(&format!("  Sensitive Literals: {}\n", self.total_matches));
        output.push('\n');

        if !self.matches_by_label.is_empty() {
            output.push_str("🔍 MATCHES BY REPLACEMENT\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");

            let mut labels: Vec<_> = self.matches_by_label.iter().collect();
            labels.sort_by(|a, b| b.1.cmp(a.1));

            for (label, count) in labels {
                output.push_str(&format!("  {label:30} {count:>5}\n"));
            }
            output.push('\n');
        }

        if !self.samples.is_empty() {
            output.push_str("📝 SAMPLES\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");

            for sample in self.samples.iter().take(10) {
                output.push_str(&format!(
                    "  [{:>6}..{:<6}] {:24} → {}\n",
                    sample.start, sample.end, sample.masked, sample.replacement
                ));
            }
            output.push('\n');
        }

        if !self.warnings.is_empty() {
            output.push_str("⚠️  WARNINGS\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for warning in &self.warnings {
                output.push_str(&format!("  • {warning}\n"));
            }
            output.push('\n');
        }

        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output
    }

    /// Format report as JSON
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the JSON report to a file
    pub fn write_to_file(&self, path: &std::path::Path) -> std::io::Result<()> {
        let json = self.format_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

/// Keep a short prefix, star out the rest
pub fn mask_literal(literal: &str) -> String {
    let len = literal.chars().count();
    if len <= VISIBLE_PREFIX * 2 {
        return "*".repeat(len);
    }

    let prefix: String = literal.chars().take(VISIBLE_PREFIX).collect();
    format!("{prefix}{} ({len} chars)", "*".repeat(6))
}
