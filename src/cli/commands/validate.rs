//! Validate rules command implementation
//!
//! This module implements the `validate-rules` command, which runs the rule
//! validator over the project rulesheet.

use crate::anonymization::validate_rules;
use crate::config::ShroudConfig;
use crate::rules::RulesheetSource;
use clap::Args;

/// Arguments for the validate-rules command
#[derive(Args, Debug)]
pub struct ValidateRulesArgs {
    /// Exit with an error when there are warnings
    #[arg(long)]
    pub strict: bool,
}

impl ValidateRulesArgs {
    /// Execute the validate-rules command
    pub async fn execute(&self, config: &ShroudConfig) -> anyhow::Result<i32> {
        let source = RulesheetSource::new(&config.rules.rulesheet);
        tracing::info!(rulesheet = %source.path().display(), "Validating rules");

        println!("🔍 Validating rulesheet: {}", source.path().display());
        println!();

        let sheet = match source.read_sheet().await {
            Ok(Some(sheet)) => {
                println!("✅ Rulesheet loaded successfully");
                sheet
            }
            Ok(None) => {
                println!("✅ No rulesheet found, nothing to validate");
                println!("   Run `shroud init` to create one");
                return Ok(0);
            }
            Err(e) => {
                eprintln!("❌ Failed to load rulesheet");
                eprintln!("   Error: {e}");
                return Ok(2);
            }
        };

        if !sheet.enabled {
            println!("⚠️  Rulesheet is disabled, its rules are not applied");
        }

        let result = validate_rules(&sheet.rules);

        for error in &result.errors {
            println!("❌ {error}");
        }
        for warning in &result.warnings {
            println!("⚠️  {warning}");
        }

        println!();
        println!("Rulesheet Summary:");
        println!("  Version: {}", sheet.version);
        println!("  Rules: {}", sheet.rules.len());
        println!("  Active Rules: {}", sheet.active_rules().len());
        println!("  Errors: {}", result.errors.len());
        println!("  Warnings: {}", result.warnings.len());
        println!();

        if let Err(e) = result.ensure_valid(self.strict) {
            tracing::warn!(error = %e, "Rule validation failed");
            eprintln!("❌ Rule validation failed: {e}");
            return Ok(2);
        }

        println!("✅ Rules are valid");
        Ok(0)
    }
}
