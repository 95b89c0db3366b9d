//! Command routing and execution
//!
//! This module handles routing CLI commands to their respective implementations.

use crate::api::Stream;
use crate::app::AppConfig;
use crate::cli::args::Commands;
use crate::cli::commands::*;
use anyhow::Result;

/// Execute a CLI command based on the parsed arguments
pub async fn execute_command(command: Commands, config: &AppConfig) -> Result<()> {
    match command {
        Commands::Run { source, dry_run } => run_command(config, &source, dry_run).await,
        Commands::Create(args) => create_command(config, args).await,
        Commands::List(args) => list_command(config, args).await,
        Commands::Describe { kind, id } => describe_command(config, kind, id).await,
        Commands::Delete { kind, id } => delete_command(config, kind, id).await,
        Commands::Stdout { id, job } => {
            stream_command(config, id, job.as_deref(), Stream::Stdout).await
        }
        Commands::Stderr { id, job } => {
            stream_command(config, id, job.as_deref(), Stream::Stderr).await
        }
    }
}
