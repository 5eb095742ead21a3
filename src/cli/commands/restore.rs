//! Restore command implementation
//!
//! Replaces every known token in the input with its original literal, using
//! the persisted mappings. Unknown token-like text is left as is.

use super::read_input;
use crate::anonymization::AnonymizationEngine;
use crate::config::ShroudConfig;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the restore command
#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Input file (reads stdin when omitted)
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

impl RestoreArgs {
    /// Execute the restore command
    pub async fn execute(&self, config: &ShroudConfig) -> anyhow::Result<i32> {
        if !config.state.enabled {
            eprintln!("⚠️  State persistence is disabled, no mappings are available");
        }

        let engine = match AnonymizationEngine::from_config(config) {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("❌ Failed to load token mappings");
                eprintln!("   Error: {e}");
                return Ok(2);
            }
        };

        let input = read_input(self.input.as_deref()).await?;
        let restored = engine.round_trip().de_anonymize(&input);

        tracing::debug!(
            mappings = engine.token_manager().len(),
            "Restored anonymized text"
        );
        print!("{restored}");
        Ok(0)
    }
}
