//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file and an empty rulesheet.

use crate::rules::Rulesheet;
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "shroud.toml")]
    pub output: PathBuf,

    /// Path where to create the rulesheet
    #[arg(long, default_value = ".shroud/rules.json")]
    pub rulesheet: PathBuf,

    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output.display(), "Initializing configuration file");

        println!("📝 Initializing Shroud configuration");
        println!();

        for path in [&self.output, &self.rulesheet] {
            if path.exists() && !self.force {
                eprintln!("❌ File already exists: {}", path.display());
                eprintln!("   Use --force to overwrite");
                return Ok(2);
            }
        }

        let rulesheet = match Rulesheet::default().to_json() {
            Ok(json) => json,
            Err(e) => {
                eprintln!("❌ Failed to render rulesheet");
                eprintln!("   Error: {e}");
                return Ok(5);
            }
        };

        let written = write_file(&self.output, &self.generate_config())
            .and_then(|_| write_file(&self.rulesheet, &rulesheet));

        match written {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output.display());
                println!("✅ Rulesheet created: {}", self.rulesheet.display());
                println!();
                println!("Next steps:");
                println!("  1. Add project rules to {}", self.rulesheet.display());
                println!("  2. Check them: shroud validate-rules");
                println!("  3. Preview matches: shroud detect --input <file>");
                println!("  4. Anonymize: shroud anonymize --input <file>");
                println!();
                Ok(0)
            }
            Err(e) => {
                eprintln!("❌ Failed to write file");
                eprintln!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate the sample configuration
    fn generate_config(&self) -> String {
        format!(
            r#"# Shroud Configuration File
# Reversible anonymization of sensitive literals

[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

[rules]
# Project rulesheet (JSON)
rulesheet = "{rulesheet}"

# Apply the built-in rules (IPs, emails, keys, tokens, credential paths)
include_builtin = true

# Block anonymization when a pattern fails while matching
strict_matching = true

[state]
# Persist token mappings between runs
enabled = true
path = ".shroud/state.json"

# Discard mappings created under another rulesheet
reset_on_rulesheet_switch = true

[logging]
# JSON log files (console logs always go to stderr)
local_enabled = false
local_path = ".shroud/logs"
local_rotation = "daily"  # daily | hourly | never

[audit]
# Audit log of anonymization calls (literals are stored as SHA-256 hashes)
enabled = false
log_path = ".shroud/audit.log"
json_format = true
"#,
            rulesheet = self.rulesheet.display()
        )
    }
}

fn write_file(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, content)
}
