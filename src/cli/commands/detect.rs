//! Detect command implementation
//!
//! Runs a detection pass and prints a [`DetectionReport`]. No token is
//! issued and the persisted state is left untouched.

use super::read_input;
use crate::anonymization::{AnonymizationEngine, DetectionReport};
use crate::config::ShroudConfig;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the detect command
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Input file (reads stdin when omitted)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Also write the JSON report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl DetectArgs {
    /// Execute the detect command
    pub async fn execute(&self, config: &ShroudConfig) -> anyhow::Result<i32> {
        let engine = match AnonymizationEngine::from_config(config) {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("❌ Failed to initialize anonymization engine");
                eprintln!("   Error: {e}");
                return Ok(2);
            }
        };

        let input = read_input(self.input.as_deref()).await?;

        let detection = match engine.detect(&input).await {
            Ok(detection) => detection,
            Err(e) => {
                crate::log_error_with_context!(&e, "Detection failed");
                eprintln!("❌ {e}");
                return Ok(3);
            }
        };

        let report = DetectionReport::from_detection(&detection, input.len());
        tracing::info!(matches = report.total_matches, "Detection complete");

        if self.json {
            println!("{}", report.format_json()?);
        } else {
            println!("{}", report.format_console());
        }

        if let Some(ref path) = self.report {
            report.write_to_file(path)?;
            eprintln!("✅ Report written to {}", path.display());
        }

        Ok(0)
    }
}
