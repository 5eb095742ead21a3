//! Mappings command implementation
//!
//! Lists the persisted token mappings with masked literals, or clears them.

use crate::anonymization::report::mask_literal;
use crate::anonymization::AnonymizationEngine;
use crate::config::ShroudConfig;
use clap::Args;

/// Arguments for the mappings command
#[derive(Args, Debug)]
pub struct MappingsArgs {
    /// Remove all mappings and reset the counters
    #[arg(long, conflicts_with = "reveal")]
    pub clear: bool,

    /// Print the literals in clear text
    #[arg(long)]
    pub reveal: bool,

    /// Print as JSON (token -> literal)
    #[arg(long)]
    pub json: bool,
}

impl MappingsArgs {
    /// Execute the mappings command
    pub async fn execute(&self, config: &ShroudConfig) -> anyhow::Result<i32> {
        let engine = match AnonymizationEngine::from_config(config) {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("❌ Failed to load token mappings");
                eprintln!("   Error: {e}");
                return Ok(2);
            }
        };
        let tokens = engine.token_manager();

        if self.clear {
            let count = tokens.len();
            tokens.clear();
            println!("✅ Cleared {count} mapping(s)");
            return Ok(0);
        }

        let entries: Vec<(String, String)> = tokens
            .reverse_mappings()
            .into_iter()
            .map(|(token, literal)| {
                let shown = if self.reveal {
                    literal
                } else {
                    mask_literal(&literal)
                };
                (token, shown)
            })
            .collect();

        if self.json {
            let map: std::collections::BTreeMap<_, _> = entries.into_iter().collect();
            println!("{}", serde_json::to_string_pretty(&map)?);
            return Ok(0);
        }

        if entries.is_empty() {
            println!("No mappings");
            return Ok(0);
        }

        println!("🔑 {} mapping(s)", entries.len());
        if let Some(scope) = tokens.scope() {
            println!("   Scope: {scope}");
        }
        println!();
        for (token, literal) in entries {
            println!("  {token:30} {literal}");
        }
        Ok(0)
    }
}
