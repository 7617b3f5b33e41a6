use std::path::{Path, PathBuf};

use ratingsync_core::config::parse_site_list;
use ratingsync_core::models::HandleConfig;
use ratingsync_core::{SyncConfig, UserEntry};

use crate::cli::ConfigCommands;
use crate::commands::common::parse_handle_arg;
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, path: &Path, mut config: SyncConfig) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            graph_dir,
            proxy,
            timeout_secs,
            max_tries,
            sites,
        } => {
            apply_init(&mut config, graph_dir, proxy, timeout_secs, max_tries, &sites)?;
            config.save_to_path(path)?;
            println!("Saved config to {}", path.display());
        }
        ConfigCommands::AddUser { id, custom, handles } => {
            let entry = build_user(id, custom, &handles)?;
            config.upsert_user(entry);
            config.save_to_path(path)?;
            println!("Saved user {id} to {}", path.display());
        }
        ConfigCommands::Show => {
            println!("# {}", path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}

pub fn apply_init(
    config: &mut SyncConfig,
    graph_dir: Option<PathBuf>,
    proxy: Option<String>,
    timeout_secs: Option<u64>,
    max_tries: Option<u32>,
    sites: &[String],
) -> Result<(), CliError> {
    if let Some(graph_dir) = graph_dir {
        config.graph_data_dir = graph_dir;
    }
    if let Some(proxy) = proxy {
        config.proxy = ratingsync_core::util::normalize_text_option(Some(proxy));
    }
    if let Some(timeout_secs) = timeout_secs {
        config.timeout_secs = timeout_secs;
    }
    if let Some(max_tries) = max_tries {
        config.max_tries = max_tries;
    }
    if !sites.is_empty() {
        config.sites = parse_site_list(sites.iter().map(String::as_str))?
            .into_iter()
            .map(|site| site.name().to_string())
            .collect();
    }
    config.validate()?;
    Ok(())
}

pub fn build_user(id: u64, custom: bool, handles: &[String]) -> Result<UserEntry, CliError> {
    let handles = handles
        .iter()
        .map(|raw| parse_handle_arg(raw))
        .collect::<Result<HandleConfig, CliError>>()?;
    Ok(UserEntry { id, custom, handles })
}
