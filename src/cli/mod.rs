//! Command Line Interface module
//!
//! Drives the same adapters, discovery and registry as the gateway, one
//! command per invocation.

pub mod args;
pub mod commands;

pub use args::*;

use anyhow::Result;

/// Main CLI application runner
pub async fn run(cli: Cli) -> Result<()> {
    let command = cli.command.clone().unwrap_or(Commands::Devices);
    commands::execute_command(command, &cli).await
}
