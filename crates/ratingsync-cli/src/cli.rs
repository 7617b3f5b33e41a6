use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ratingsync")]
#[command(about = "Sync competitive-programming rating history into graph caches")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to the config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch contest history and update graph caches
    Sync {
        /// Comma-separated sites to sync (defaults to the configured list)
        #[arg(long, value_delimiter = ',', value_name = "SITES")]
        sites: Vec<String>,
        /// Only sync these user ids
        #[arg(long = "user", value_name = "ID")]
        users: Vec<u64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show cached graph data for a user
    Show {
        /// User id
        #[arg(long, value_name = "ID")]
        user: u64,
        /// Read the custom-user cache
        #[arg(long)]
        custom: bool,
        /// Output the full snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage sync configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update the config file
    Init {
        /// Directory holding per-user graph caches
        #[arg(long, value_name = "PATH")]
        graph_dir: Option<PathBuf>,
        /// Outbound proxy URL
        #[arg(long, value_name = "URL")]
        proxy: Option<String>,
        /// Per-request timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout_secs: Option<u64>,
        /// Attempts allowed per request
        #[arg(long, value_name = "N")]
        max_tries: Option<u32>,
        /// Comma-separated default sites
        #[arg(long, value_delimiter = ',', value_name = "SITES")]
        sites: Vec<String>,
    },
    /// Add or replace a user and their handles
    AddUser {
        /// User id
        #[arg(long, value_name = "ID")]
        id: u64,
        /// Mark as a custom user (separate cache file)
        #[arg(long)]
        custom: bool,
        /// Site handle, repeatable
        #[arg(long = "handle", value_name = "SITE=HANDLE")]
        handles: Vec<String>,
    },
    /// Print the resolved config
    Show,
}
