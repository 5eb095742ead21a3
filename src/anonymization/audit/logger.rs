//! Audit logger for anonymization calls

use crate::anonymization::engine::AnonymizationResult;
use crate::domain::context::ResultExt;
use crate::domain::Result;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Audit log entry
#[derive(Debug, Serialize)]
struct AuditLogEntry<'a> {
    timestamp: String,
    total_matches: usize,
    per_pattern_counts: &'a BTreeMap<String, usize>,
    processing_time_ms: u64,
    tokens: Vec<AuditToken>,
}

/// Issued token with the hash of its literal
#[derive(Debug, Serialize)]
struct AuditToken {
    token: String,
    /// SHA-256 of the literal (never log plaintext)
    literal_hash: String,
}

/// Append-only audit log
#[derive(Debug)]
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
    enabled: bool,
}

impl AuditLogger {
    /// Create a new audit logger
    pub fn new(log_path: PathBuf, json_format: bool, enabled: bool) -> Result<Self> {
        if enabled {
            if let Some(parent) = log_path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create audit log directory: {}", parent.display())
                    })?;
                }
            }
        }

        Ok(Self {
            log_path,
            json_format,
            enabled,
        })
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Record one anonymization call
    pub fn log_anonymization(&self, result: &AnonymizationResult) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let entry = AuditLogEntry {
            timestamp: result.timestamp.to_rfc3339(),
            total_matches: result.stats.total_matches,
            per_pattern_counts: &result.stats.per_pattern_counts,
            processing_time_ms: result.processing_time_ms,
            tokens: result
                .mappings
                .iter()
                .map(|(literal, token)| AuditToken {
                    token: token.clone(),
                    literal_hash: hash_literal(literal),
                })
                .collect(),
        };

        self.write_entry(&entry)
    }

    fn write_entry(&self, entry: &AuditLogEntry<'_>) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open audit log: {}", self.log_path.display()))?;

        if self.json_format {
            let json_line = serde_json::to_string(entry).context("Failed to serialize audit entry")?;
            writeln!(file, "{json_line}").context("Failed to write audit entry")?;
        } else {
            let tokens = entry
                .tokens
                .iter()
                .map(|t| format!("{}={}", t.token, &t.literal_hash[..12]))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(
                file,
                "[{}] Matches: {} | Tokens: {} | Time: {}ms | {}",
                entry.timestamp,
                entry.total_matches,
                entry.tokens.len(),
                entry.processing_time_ms,
                tokens
            )
            .context("Failed to write audit entry")?;
        }

        Ok(())
    }
}

/// Hex SHA-256 of a literal
pub fn hash_literal(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    format!("{:x}", hasher.finalize())
}
