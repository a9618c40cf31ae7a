//! disco CLI - keep generated API clients in sync with a discovery catalog
//!
//! This is the main entry point for the disco command-line interface.
//! Command implementations are organized in separate modules for better
//! maintainability and single responsibility.

use anyhow::Result;
use clap::Parser;
use disco_core::DISCOVERY_INDEX_URL;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod cli;
mod commands;
mod renderer;

use cli::{Cli, Commands};
use commands::generate::GenerateParams;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_logging(&cli)?;
    execute_command(cli).await
}

fn initialize_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

async fn execute_command(cli: Cli) -> Result<()> {
    let index_url = cli
        .index_url
        .clone()
        .unwrap_or_else(|| DISCOVERY_INDEX_URL.to_string());
    let policy_path = cli.policy.as_deref();

    match cli.command {
        Commands::Generate {
            dest,
            urls,
            files,
            from_discovery,
            preferred_only,
            apis,
            names,
            names_out,
            clean,
        } => {
            let params = GenerateParams {
                dest,
                urls,
                files,
                from_discovery,
                preferred_only,
                apis,
                names,
                names_out,
                clean,
            };
            commands::generate::execute(params, policy_path, &index_url, cli.quiet).await?;
        },

        Commands::List { preferred_only } => {
            commands::list::execute(policy_path, &index_url, preferred_only, cli.verbose).await?;
        },
    }

    Ok(())
}
