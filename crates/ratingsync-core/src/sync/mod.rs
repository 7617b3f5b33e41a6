//! Per-user sync orchestration.
//!
//! One run loads the user's cached snapshot, fans every configured site
//! adapter out onto a `JoinSet`, waits for all of them, then merges and
//! persists exactly once. Adapter failures never abort the run; they only
//! leave that site's slot to the merge fallback.

use std::collections::BTreeMap;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::{SyncConfig, UserEntry};
use crate::error::Result;
use crate::http::RequestClient;
use crate::models::{ContestMapping, GraphSnapshot, HandleConfig, SiteKey, SiteSeries};
use crate::sites::{AdapterRegistry, SiteFetch};
use crate::store::{FreshSeries, GraphDataStore, PersistOutcome};

/// Working state for one user during one sync run.
#[derive(Debug, Clone)]
pub struct UserSyncState {
    pub user_id: u64,
    pub custom: bool,
    pub handles: HandleConfig,
    pub previous: Option<GraphSnapshot>,
    pub mapping: ContestMapping,
    /// Series fetched this round; a site absent here was not updated
    pub fresh: FreshSeries,
}

impl UserSyncState {
    pub fn load(store: &GraphDataStore, user: &UserEntry) -> Result<Self> {
        let loaded = store.load(user.id, user.custom)?;
        Ok(Self {
            user_id: user.id,
            custom: user.custom,
            handles: user.handles.clone(),
            previous: loaded.previous,
            mapping: loaded.mapping,
            fresh: FreshSeries::new(),
        })
    }

    /// Fill a site's slot for this round.
    pub fn record(&mut self, site: SiteKey, series: Vec<SiteSeries>) {
        self.fresh.insert(site, series);
    }

    /// Merge this round's results and persist them, consuming the state.
    pub fn finish(self, store: &GraphDataStore) -> Result<(GraphSnapshot, PersistOutcome)> {
        let merged = GraphDataStore::merge(self.previous.as_ref(), &self.mapping, self.fresh);
        let outcome = store.persist(self.user_id, self.custom, self.previous.as_ref(), &merged)?;
        Ok((merged, outcome))
    }
}

/// What happened to one scheduled site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteOutcome {
    Fetched { series: usize, records: usize },
    Failed(String),
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub user_id: u64,
    pub custom: bool,
    /// Scheduled sites only; sites without a handle are absent
    pub outcomes: BTreeMap<SiteKey, SiteOutcome>,
    pub persist: PersistOutcome,
    /// Records in the merged snapshot
    pub records: usize,
}

impl SyncReport {
    pub fn failed_sites(&self) -> Vec<SiteKey> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, SiteOutcome::Failed(_)))
            .map(|(site, _)| *site)
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct SyncOrchestrator {
    client: RequestClient,
    registry: AdapterRegistry,
    store: GraphDataStore,
}

impl SyncOrchestrator {
    pub const fn new(client: RequestClient, registry: AdapterRegistry, store: GraphDataStore) -> Self {
        Self {
            client,
            registry,
            store,
        }
    }

    /// Production orchestrator: reqwest transport, default adapters, and the
    /// configured cache directory.
    pub fn from_config(config: &SyncConfig) -> Result<Self> {
        let client = RequestClient::from_config(config)?;
        let registry = AdapterRegistry::with_defaults();
        registry.validate(&config.site_keys()?)?;
        Ok(Self::new(
            client,
            registry,
            GraphDataStore::new(config.graph_data_dir.clone()),
        ))
    }

    pub const fn store(&self) -> &GraphDataStore {
        &self.store
    }

    /// Sync `sites` for one user.
    ///
    /// Sites without a configured handle are skipped. Only loading the cache
    /// or persisting the merged snapshot can fail.
    pub async fn update(&self, user: &UserEntry, sites: &[SiteKey]) -> Result<SyncReport> {
        self.registry.validate(sites)?;
        let mut state = UserSyncState::load(&self.store, user)?;
        info!(user_id = user.id, custom = user.custom, "Syncing graph data");

        let mut tasks = JoinSet::new();
        let mut scheduled = Vec::new();
        for &site in sites {
            if scheduled.contains(&site) {
                continue;
            }
            let Some(handle) = state.handles.handle_for(site) else {
                debug!(user_id = user.id, site = %site, "No handle configured, skipping");
                continue;
            };
            let Some(adapter) = self.registry.get(site) else {
                continue;
            };
            let client = self.client.clone();
            let handle = handle.to_string();
            scheduled.push(site);
            tasks.spawn(async move { (site, adapter.fetch(&client, &handle).await) });
        }

        let mut outcomes = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            let (site, result) = match joined {
                Ok(finished) => finished,
                Err(error) => {
                    warn!(user_id = user.id, %error, "Adapter task did not complete");
                    continue;
                }
            };
            let outcome = match result {
                Ok(SiteFetch::Series(series)) => {
                    let outcome = SiteOutcome::Fetched {
                        series: series.len(),
                        records: series.iter().map(SiteSeries::len).sum(),
                    };
                    state.record(site, series);
                    outcome
                }
                Ok(SiteFetch::Unsupported) => SiteOutcome::Unsupported,
                Err(error) => {
                    warn!(user_id = user.id, site = %site, %error, "Site fetch failed, keeping previous data");
                    SiteOutcome::Failed(error.to_string())
                }
            };
            outcomes.insert(site, outcome);
        }
        for site in scheduled {
            outcomes
                .entry(site)
                .or_insert_with(|| SiteOutcome::Failed("adapter task aborted".to_string()));
        }

        let (merged, persist) = state.finish(&self.store)?;
        info!(user_id = user.id, ?persist, records = merged.record_count(), "Sync finished");
        Ok(SyncReport {
            user_id: user.id,
            custom: user.custom,
            outcomes,
            persist,
            records: merged.record_count(),
        })
    }

    /// Sync each user in turn, continuing past per-user errors.
    pub async fn sync_all(&self, users: &[UserEntry], sites: &[SiteKey]) -> Vec<(u64, Result<SyncReport>)> {
        let mut results = Vec::with_capacity(users.len());
        for user in users {
            let result = self.update(user, sites).await;
            if let Err(error) = &result {
                warn!(user_id = user.id, %error, "Sync failed for user");
            }
            results.push((user.id, result));
        }
        results
    }
}
