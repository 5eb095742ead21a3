//! Anonymize command implementation
//!
//! Prints the anonymized text on stdout. When the engine blocks the call,
//! nothing is printed on stdout and the exit code is 3.

use super::read_input;
use crate::anonymization::AnonymizationEngine;
use crate::config::ShroudConfig;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the anonymize command
#[derive(Args, Debug)]
pub struct AnonymizeArgs {
    /// Input file (reads stdin when omitted)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Print a JSON summary (anonymized text, tokens, counts) instead of the text
    #[arg(long)]
    pub json: bool,
}

impl AnonymizeArgs {
    /// Execute the anonymize command
    pub async fn execute(&self, config: &ShroudConfig) -> anyhow::Result<i32> {
        let engine = match AnonymizationEngine::from_config(config) {
            Ok(engine) => engine,
            Err(e) => {
                crate::log_error_with_context!(&e, "Engine initialization failed");
                eprintln!("❌ Failed to initialize anonymization engine");
                eprintln!("   Error: {e}");
                return Ok(2);
            }
        };

        let input = read_input(self.input.as_deref()).await?;

        let result = match engine.anonymize(&input).await {
            Ok(result) => result,
            Err(e) => {
                crate::log_error_with_context!(&e, "Anonymization blocked");
                eprintln!("❌ {e}");
                return Ok(3);
            }
        };

        for failure in &result.failed_patterns {
            eprintln!(
                "⚠️  Pattern \"{}\" failed during matching: {}",
                failure.pattern, failure.reason
            );
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result.summary())?);
        } else {
            print!("{}", result.anonymized);
        }

        Ok(0)
    }
}
