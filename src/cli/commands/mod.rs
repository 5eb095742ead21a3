//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod anonymize;
pub mod detect;
pub mod init;
pub mod mappings;
pub mod restore;
pub mod validate;

use anyhow::Context;
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Read the command input from a file, or from stdin when no file is given
pub async fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read input file {}", path.display())),
        None => {
            let mut input = String::new();
            tokio::io::stdin()
                .read_to_string(&mut input)
                .await
                .context("Failed to read stdin")?;
            Ok(input)
        }
    }
}
