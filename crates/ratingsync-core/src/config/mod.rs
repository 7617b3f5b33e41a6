//! Sync configuration.
//!
//! A single `SyncConfig` value carries request tuning, the default site list,
//! the cache directory and the configured users. It is loaded once by the
//! caller and passed explicitly into the request client and orchestrator.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{HandleConfig, SiteKey};
use crate::util::{is_http_url, normalize_text_option};

const DEFAULT_TIMEOUT_SECS: u64 = 20;
const DEFAULT_MAX_TRIES: u32 = 3;
const DEFAULT_GRAPH_DATA_DIR: &str = "graph_data";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Attempts allowed per request before giving up
    #[serde(default = "default_max_tries")]
    pub max_tries: u32,
    /// Optional outbound proxy URL
    #[serde(default)]
    pub proxy: Option<String>,
    /// Sites synced when the caller does not restrict the list
    #[serde(default = "default_sites")]
    pub sites: Vec<String>,
    /// Directory holding per-user graph caches
    #[serde(default = "default_graph_data_dir")]
    pub graph_data_dir: PathBuf,
    /// Users to sync
    #[serde(default)]
    pub users: Vec<UserEntry>,
}

/// A user whose graph data is synced.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserEntry {
    pub id: u64,
    /// Selects the `_custom` variant of the cache file
    #[serde(default)]
    pub custom: bool,
    #[serde(default)]
    pub handles: HandleConfig,
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

const fn default_max_tries() -> u32 {
    DEFAULT_MAX_TRIES
}

fn default_sites() -> Vec<String> {
    SiteKey::ALL.iter().map(|site| site.name().to_string()).collect()
}

fn default_graph_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_GRAPH_DATA_DIR)
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_tries: DEFAULT_MAX_TRIES,
            proxy: None,
            sites: default_sites(),
            graph_data_dir: default_graph_data_dir(),
            users: Vec::new(),
        }
    }
}

impl SyncConfig {
    /// Load config from `path`, falling back to defaults when it does not exist.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let mut config = serde_json::from_str::<Self>(&raw).map_err(|error| {
            Error::Config(format!("Failed to parse config at {}: {error}", path.display()))
        })?;
        config.normalize();
        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    /// Check the values a request client and orchestrator depend on.
    pub fn validate(&self) -> Result<()> {
        if self.max_tries == 0 {
            return Err(Error::Config("max_tries must be at least 1".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be at least 1".to_string()));
        }
        if let Some(proxy) = &self.proxy {
            if !is_http_url(proxy) {
                return Err(Error::Config(
                    "proxy must include http:// or https://".to_string(),
                ));
            }
        }
        self.site_keys().map(|_| ())
    }

    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Configured default sites, parsed.
    pub fn site_keys(&self) -> Result<Vec<SiteKey>> {
        parse_site_list(self.sites.iter().map(String::as_str))
    }

    pub fn user(&self, id: u64, custom: bool) -> Option<&UserEntry> {
        self.users
            .iter()
            .find(|user| user.id == id && user.custom == custom)
    }

    /// Insert a user, replacing any entry with the same id and custom flag.
    pub fn upsert_user(&mut self, entry: UserEntry) {
        if let Some(existing) = self
            .users
            .iter_mut()
            .find(|user| user.id == entry.id && user.custom == entry.custom)
        {
            *existing = entry;
        } else {
            self.users.push(entry);
        }
    }

    fn normalize(&mut self) {
        self.proxy = normalize_text_option(self.proxy.take());
        self.sites = self
            .sites
            .iter()
            .filter_map(|site| normalize_text_option(Some(site.to_ascii_lowercase())))
            .collect();
        for user in &mut self.users {
            user.handles.normalize();
        }
    }
}

/// Parse site names, rejecting unknown ones and dropping duplicates.
pub fn parse_site_list<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<Vec<SiteKey>> {
    let mut sites = Vec::new();
    for name in names {
        if name.trim().is_empty() {
            continue;
        }
        let site = name
            .parse::<SiteKey>()
            .map_err(|error| Error::Config(error.to_string()))?;
        if !sites.contains(&site) {
            sites.push(site);
        }
    }
    Ok(sites)
}
