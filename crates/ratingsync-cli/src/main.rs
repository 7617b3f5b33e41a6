//! ratingsync CLI - sync rating history for configured users
//!
//! Reads users and handles from the config file, fetches each site's contest
//! history and refreshes the per-user graph caches.

mod cli;
mod commands;
mod config_file;
mod error;


use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::config::run_config;
use crate::commands::show::run_show;
use crate::commands::sync::run_sync;
use crate::config_file::{load_config, resolve_config_path};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ratingsync=info".parse().expect("valid log directive")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.config.as_deref())?;
    let config = load_config(&config_path)?;

    match cli.command {
        Commands::Sync { sites, users, json } => {
            run_sync(&config, &sites, &users, json).await?;
        }
        Commands::Show { user, custom, json } => run_show(&config, user, custom, json)?,
        Commands::Config { command } => run_config(command, &config_path, config)?,
    }

    Ok(())
}
