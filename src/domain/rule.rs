//! Anonymization rule model
//!
//! A [`Rule`] pairs a regular-expression source string with a replacement
//! label. Rules are authored outside the engine (rulesheet, built-in library)
//! and are treated as read-only input.

use serde::{Deserialize, Serialize};

/// Placeholder substituted with the sequence number in template labels
pub const INDEX_PLACEHOLDER: &str = "{index}";

/// A single anonymization rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Stable identifier (generated when the rulesheet omits it)
    #[serde(default = "generate_rule_id")]
    pub id: String,

    /// Regular expression source
    #[serde(default)]
    pub pattern: String,

    /// Token label template (e.g. `ip`, `IP_{index}`, `lxcHost`)
    #[serde(default)]
    pub replacement: String,

    /// Disabled rules are ignored by matcher and validator
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Free-form description shown in reports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn generate_rule_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn default_enabled() -> bool {
    true
}

impl Rule {
    /// Creates an enabled rule with a generated id
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            id: generate_rule_id(),
            pattern: pattern.into(),
            replacement: replacement.into(),
            enabled: true,
            description: None,
        }
    }

    /// Sets the rule id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the rule as disabled
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// True when both pattern and replacement are blank
    pub fn is_blank(&self) -> bool {
        self.pattern.trim().is_empty() && self.replacement.trim().is_empty()
    }

    /// Pattern length used for precedence: longer source strings win
    pub fn precedence(&self) -> usize {
        self.pattern.chars().count()
    }
}
