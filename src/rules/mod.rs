//! Rule sources
//!
//! The engine reloads its rules from a [`RuleSource`] on every call, so
//! edits to a rulesheet take effect without any cache invalidation.
//!
//! - [`BuiltinRules`]: embedded library of common sensitive literals
//! - [`RulesheetSource`]: project rules from a JSON rulesheet
//! - [`StaticRules`]: fixed in-memory list
//! - [`CombinedSource`]: concatenation of several sources, in order

pub mod builtin;
pub mod rulesheet;

pub use builtin::BuiltinRules;
pub use rulesheet::{Rulesheet, RulesheetSource};

use crate::domain::{Result, Rule};
use async_trait::async_trait;
use std::sync::Arc;

/// Rule-management collaborator
#[async_trait]
pub trait RuleSource: Send + Sync {
    /// Load the current rule list
    ///
    /// # Errors
    ///
    /// Returns an error if the rules exist but cannot be read or parsed.
    async fn load_rules(&self) -> Result<Vec<Rule>>;

    /// Short description for logs
    fn describe(&self) -> String;
}

/// Fixed rule list
#[derive(Debug, Clone, Default)]
pub struct StaticRules {
    rules: Vec<Rule>,
}

impl StaticRules {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }
}

#[async_trait]
impl RuleSource for StaticRules {
    async fn load_rules(&self) -> Result<Vec<Rule>> {
        Ok(self.rules.clone())
    }

    fn describe(&self) -> String {
        format!("static ({} rules)", self.rules.len())
    }
}

/// Rules of several sources, concatenated in order
#[derive(Clone, Default)]
pub struct CombinedSource {
    sources: Vec<Arc<dyn RuleSource>>,
}

impl CombinedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source
    pub fn with(mut self, source: Arc<dyn RuleSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[async_trait]
impl RuleSource for CombinedSource {
    async fn load_rules(&self) -> Result<Vec<Rule>> {
        let mut rules = Vec::new();
        for source in &self.sources {
            let loaded = source.load_rules().await?;
            tracing::trace!(source = %source.describe(), rules = loaded.len(), "Rules loaded");
            rules.extend(loaded);
        }
        Ok(rules)
    }

    fn describe(&self) -> String {
        self.sources
            .iter()
            .map(|s| s.describe())
            .collect::<Vec<_>>()
            .join(" + ")
    }
}

impl std::fmt::Debug for CombinedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombinedSource")
            .field("sources", &self.describe())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_combined_source_keeps_order() {
        let first = StaticRules::new(vec![Rule::new("a+", "A").with_id("a")]);
        let second = StaticRules::new(vec![Rule::new("b+", "B").with_id("b")]);
        let combined = CombinedSource::new()
            .with(Arc::new(first))
            .with(Arc::new(second));

        let ids: Vec<String> = combined
            .load_rules()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(combined.describe(), "static (1 rules) + static (1 rules)");
    }

    #[tokio::test]
    async fn test_empty_combined_source() {
        let combined = CombinedSource::new();
        assert!(combined.is_empty());
        assert!(combined.load_rules().await.unwrap().is_empty());
    }
}
