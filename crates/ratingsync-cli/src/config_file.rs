//! Config file location and environment overrides.

use std::path::{Path, PathBuf};

use ratingsync_core::util::normalize_text_option;
use ratingsync_core::SyncConfig;

use crate::error::CliError;

const CONFIG_FILE_NAME: &str = "config.json";

pub fn default_config_path() -> Result<PathBuf, CliError> {
    dirs::config_dir()
        .map(|dir| dir.join("ratingsync").join(CONFIG_FILE_NAME))
        .ok_or_else(|| CliError::Config("Failed to resolve config directory".to_string()))
}

pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf, CliError> {
    explicit.map_or_else(default_config_path, |path| Ok(path.to_path_buf()))
}

/// Load config and apply `RATINGSYNC_GRAPH_DIR` / `RATINGSYNC_PROXY`.
pub fn load_config(path: &Path) -> Result<SyncConfig, CliError> {
    let mut config = SyncConfig::load_from_path(path)?;
    apply_overrides(
        &mut config,
        std::env::var("RATINGSYNC_GRAPH_DIR").ok(),
        std::env::var("RATINGSYNC_PROXY").ok(),
    );
    Ok(config)
}

pub fn apply_overrides(config: &mut SyncConfig, graph_dir: Option<String>, proxy: Option<String>) {
    if let Some(graph_dir) = normalize_text_option(graph_dir) {
        config.graph_data_dir = PathBuf::from(graph_dir);
    }
    if let Some(proxy) = normalize_text_option(proxy) {
        config.proxy = Some(proxy);
    }
}
