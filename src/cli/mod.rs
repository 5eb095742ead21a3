//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Shroud using clap.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Shroud - Reversible text anonymization
#[derive(Parser, Debug)]
#[command(name = "shroud")]
#[command(version, about, long_about = None)]
#[command(author = "Shroud Contributors")]
pub struct Cli {
    /// Path to configuration file (defaults to shroud.toml when present)
    #[arg(short, long, env = "SHROUD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SHROUD_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a configuration file and an empty rulesheet
    Init(commands::init::InitArgs),

    /// Replace sensitive literals with tokens
    Anonymize(commands::anonymize::AnonymizeArgs),

    /// Report sensitive literals without issuing tokens
    Detect(commands::detect::DetectArgs),

    /// Check the rulesheet for invalid or conflicting rules
    ValidateRules(commands::validate::ValidateRulesArgs),

    /// Replace tokens with their original literals
    Restore(commands::restore::RestoreArgs),

    /// List or clear persisted token mappings
    Mappings(commands::mappings::MappingsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_anonymize() {
        let cli = Cli::parse_from(["shroud", "anonymize"]);
        assert!(cli.config.is_none());
        assert!(matches!(cli.command, Commands::Anonymize(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["shroud", "--config", "custom.toml", "detect"]);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(matches!(cli.command, Commands::Detect(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["shroud", "--log-level", "debug", "anonymize"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_anonymize_options() {
        let cli = Cli::parse_from(["shroud", "anonymize", "--input", "notes.txt", "--json"]);
        match cli.command {
            Commands::Anonymize(args) => {
                assert_eq!(args.input, Some(PathBuf::from("notes.txt")));
                assert!(args.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_validate_rules() {
        let cli = Cli::parse_from(["shroud", "validate-rules"]);
        assert!(matches!(cli.command, Commands::ValidateRules(_)));
    }

    #[test]
    fn test_cli_parse_restore() {
        let cli = Cli::parse_from(["shroud", "restore", "-i", "out.txt"]);
        match cli.command {
            Commands::Restore(args) => assert_eq!(args.input, Some(PathBuf::from("out.txt"))),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_mappings_clear() {
        let cli = Cli::parse_from(["shroud", "mappings", "--clear"]);
        match cli.command {
            Commands::Mappings(args) => {
                assert!(args.clear);
                assert!(!args.reveal);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["shroud", "init", "--force"]);
        assert!(matches!(cli.command, Commands::Init(ref args) if args.force));
    }
}
