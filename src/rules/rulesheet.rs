//! JSON rulesheet
//!
//! ```json
//! {
//!   "version": "1",
//!   "enabled": true,
//!   "rules": [
//!     { "id": "db", "pattern": "db\\d+\\.corp\\.internal", "replacement": "dbHost" }
//!   ]
//! }
//! ```
//!
//! Unknown keys are ignored. A missing file means "no project rules"; a file
//! that exists but does not parse is an error, never an empty rule set.

use super::RuleSource;
use crate::domain::{Result, Rule, ShroudError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_version() -> String {
    "1".to_string()
}

fn default_enabled() -> bool {
    true
}

/// Project rulesheet document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rulesheet {
    #[serde(default = "default_version")]
    pub version: String,

    /// A disabled sheet contributes no rules
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl Default for Rulesheet {
    fn default() -> Self {
        Self {
            version: default_version(),
            enabled: true,
            rules: Vec::new(),
        }
    }
}

impl Rulesheet {
    /// Parse a rulesheet document
    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| ShroudError::Rules(format!("Rulesheet is not valid: {e}")))
    }

    /// Rules to apply: none when the sheet is disabled
    pub fn active_rules(&self) -> Vec<Rule> {
        if self.enabled {
            self.rules.clone()
        } else {
            Vec::new()
        }
    }

    /// Pretty JSON rendering
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Rule source backed by a rulesheet file, re-read on every load
#[derive(Debug, Clone)]
pub struct RulesheetSource {
    path: PathBuf,
}

impl RulesheetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the sheet, `None` when the file does not exist
    pub async fn read_sheet(&self) -> Result<Option<Rulesheet>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Rulesheet::parse(&content).map(Some).map_err(|e| {
                ShroudError::Rules(format!("{}: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Rulesheet not found, no project rules");
                Ok(None)
            }
            Err(e) => Err(ShroudError::Rules(format!(
                "Failed to read rulesheet {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

#[async_trait]
impl RuleSource for RulesheetSource {
    async fn load_rules(&self) -> Result<Vec<Rule>> {
        let Some(sheet) = self.read_sheet().await? else {
            return Ok(Vec::new());
        };

        if !sheet.enabled {
            tracing::debug!(path = %self.path.display(), "Rulesheet disabled");
        }
        Ok(sheet.active_rules())
    }

    fn describe(&self) -> String {
        format!("rulesheet:{}", self.path.display())
    }
}
