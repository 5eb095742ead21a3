// Shroud - Reversible anonymization of sensitive text
// Copyright (c) 2025 Shroud Contributors
// Licensed under the MIT License

use clap::Parser;
use shroud::cli::{Cli, Commands};
use shroud::config::{load_config_or_default, ShroudConfig};
use shroud::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // init runs before any configuration exists
    let config = match &cli.command {
        Commands::Init(_) => ShroudConfig::default(),
        _ => match load_config_or_default(cli.config.as_deref()) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load configuration");
                eprintln!("   Error: {e}");
                process::exit(2);
            }
        },
    };

    let log_level = cli
        .log_level
        .as_deref()
        .unwrap_or(&config.application.log_level);

    // Keep the guard alive so the file writer flushes on exit
    let logging_guard = match init_logging(log_level, &config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "Shroud starting");

    let exit_code = match execute_command(&cli, &config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e:#}");
            5
        }
    };

    drop(logging_guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, config: &ShroudConfig) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Init(args) => args.execute().await,
        Commands::Anonymize(args) => args.execute(config).await,
        Commands::Detect(args) => args.execute(config).await,
        Commands::ValidateRules(args) => args.execute(config).await,
        Commands::Restore(args) => args.execute(config).await,
        Commands::Mappings(args) => args.execute(config).await,
    }
}
