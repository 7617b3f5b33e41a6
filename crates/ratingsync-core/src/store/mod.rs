//! Per-user graph cache: load, merge and persist.
//!
//! Each (user, custom flag) pair owns one JSON file holding a serialized
//! `GraphSnapshot`. A sync run loads it, merges freshly fetched series over
//! it and rewrites it only when the merged snapshot differs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Result;
use crate::models::{ContestMapping, GraphSnapshot, SiteKey, SiteSeries};

/// Series fetched this round, keyed by the site slot they belong to.
pub type FreshSeries = BTreeMap<SiteKey, Vec<SiteSeries>>;

/// Previously persisted state for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedGraph {
    /// Last persisted snapshot, `None` on the first sync
    pub previous: Option<GraphSnapshot>,
    /// Title index derived from `previous`
    pub mapping: ContestMapping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Merged snapshot equals the previous one; nothing was written
    Unchanged,
    /// The cache file was (re)written
    Written,
}

#[derive(Debug, Clone)]
pub struct GraphDataStore {
    dir: PathBuf,
}

impl GraphDataStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Cache file for a user; custom users get a `_custom` suffix.
    pub fn path_for(&self, user_id: u64, custom: bool) -> PathBuf {
        let file_name = if custom {
            format!("{user_id}_custom.json")
        } else {
            format!("{user_id}.json")
        };
        self.dir.join(file_name)
    }

    pub fn load(&self, user_id: u64, custom: bool) -> Result<LoadedGraph> {
        let path = self.path_for(user_id, custom);
        if !path.exists() {
            debug!(user_id, custom, "No cached graph data");
            return Ok(LoadedGraph::default());
        }

        let raw = std::fs::read(&path)?;
        let previous: GraphSnapshot = serde_json::from_slice(&raw)?;
        let mapping = previous.contest_mapping();
        debug!(user_id, custom, series = mapping.len(), "Loaded cached graph data");
        Ok(LoadedGraph {
            previous: Some(previous),
            mapping,
        })
    }

    /// Reconcile freshly fetched series with the previous snapshot.
    ///
    /// Sites missing from `fresh` keep their previous series. For every fresh
    /// series whose title was seen before, a smaller record set is replaced
    /// by the previously recorded one.
    pub fn merge(
        previous: Option<&GraphSnapshot>,
        mapping: &ContestMapping,
        fresh: FreshSeries,
    ) -> GraphSnapshot {
        let mut merged = previous.cloned().unwrap_or_default();
        for (site, mut series) in fresh {
            for entry in &mut series {
                let Some(recorded) = mapping.get(&entry.title) else {
                    continue;
                };
                if entry.len() < recorded.len() {
                    debug!(
                        site = %site,
                        title = %entry.title,
                        fetched = entry.len(),
                        recorded = recorded.len(),
                        "Fetched series shrank, keeping recorded history"
                    );
                    entry.data.clone_from(recorded);
                }
            }
            merged.set_site(site, series);
        }
        merged
    }

    /// Write `snapshot` unless it equals `previous`.
    ///
    /// The file is staged next to the target and renamed into place, so the
    /// cache is never observed half-written.
    pub fn persist(
        &self,
        user_id: u64,
        custom: bool,
        previous: Option<&GraphSnapshot>,
        snapshot: &GraphSnapshot,
    ) -> Result<PersistOutcome> {
        if previous == Some(snapshot) {
            info!(user_id, custom, "No updates in the graph data");
            return Ok(PersistOutcome::Unchanged);
        }

        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(user_id, custom);
        let staging = path.with_extension("json.tmp");
        let serialized = serde_json::to_vec(snapshot)?;
        std::fs::write(&staging, serialized)?;
        std::fs::rename(&staging, &path)?;

        info!(user_id, custom, path = %path.display(), records = snapshot.record_count(), "Wrote graph data");
        Ok(PersistOutcome::Written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContestRecord;
    use pretty_assertions::assert_eq;

    fn series(title: &str, keys: &[&str]) -> SiteSeries {
        let mut series = SiteSeries::new(title);
        for key in keys {
            series.insert(*key, ContestRecord::new(format!("contest {key}"), "url", "1500", 1));
        }
        series
    }

    fn snapshot_with(site: SiteKey, entries: Vec<SiteSeries>) -> GraphSnapshot {
        let mut snapshot = GraphSnapshot::empty();
        snapshot.set_site(site, entries);
        snapshot
    }

    #[test]
    fn merge_keeps_longer_recorded_series() {
        let previous = snapshot_with(SiteKey::Codeforces, vec![series("T", &["a", "b"])]);
        let mapping = previous.contest_mapping();
        let fresh = FreshSeries::from([(SiteKey::Codeforces, vec![series("T", &["a"])])]);

        let merged = GraphDataStore::merge(Some(&previous), &mapping, fresh);
        assert_eq!(merged, previous);
    }

    #[test]
    fn merge_passes_through_growing_series() {
        let previous = snapshot_with(SiteKey::Codeforces, vec![series("T", &["a"])]);
        let mapping = previous.contest_mapping();
        let fresh = FreshSeries::from([(SiteKey::Codeforces, vec![series("T", &["a", "b"])])]);

        let merged = GraphDataStore::merge(Some(&previous), &mapping, fresh);
        assert_eq!(merged.find(SiteKey::Codeforces, "T").map(SiteSeries::len), Some(2));
    }

    #[test]
    fn merge_passes_through_equal_count_with_new_values() {
        let previous = snapshot_with(SiteKey::Codeforces, vec![series("T", &["a"])]);
        let mapping = previous.contest_mapping();
        let replacement = series("T", &["z"]);
        let fresh = FreshSeries::from([(SiteKey::Codeforces, vec![replacement.clone()])]);

        let merged = GraphDataStore::merge(Some(&previous), &mapping, fresh);
        assert_eq!(merged.find(SiteKey::Codeforces, "T"), Some(&replacement));
    }

    #[test]
    fn merge_without_history_uses_fresh_data() {
        let fresh = FreshSeries::from([(SiteKey::HackerRank, vec![series("HackerRank - ai", &[])])]);

        let merged = GraphDataStore::merge(None, &ContestMapping::default(), fresh);
        assert_eq!(merged.series(SiteKey::HackerRank).len(), 1);
        assert!(merged.series(SiteKey::CodeChef).is_empty());
    }

    #[test]
    fn merge_keeps_sites_that_were_not_fetched() {
        let mut previous = snapshot_with(SiteKey::CodeChef, vec![series("CodeChef Long", &["a"])]);
        previous.set_site(SiteKey::Codeforces, vec![series("Codeforces", &["b"])]);
        let mapping = previous.contest_mapping();
        let fresh = FreshSeries::from([(SiteKey::Codeforces, vec![series("Codeforces", &["b", "c"])])]);

        let merged = GraphDataStore::merge(Some(&previous), &mapping, fresh);
        assert_eq!(merged.series(SiteKey::CodeChef), previous.series(SiteKey::CodeChef));
        assert_eq!(merged.find(SiteKey::Codeforces, "Codeforces").map(SiteSeries::len), Some(2));
    }

    #[test]
    fn persist_twice_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = GraphDataStore::new(dir.path().join("graph_data"));
        let snapshot = snapshot_with(SiteKey::Codeforces, vec![series("Codeforces", &["a"])]);

        let first = store.load(1, false).unwrap();
        assert_eq!(first.previous, None);
        assert_eq!(
            store.persist(1, false, first.previous.as_ref(), &snapshot).unwrap(),
            PersistOutcome::Written
        );

        let second = store.load(1, false).unwrap();
        assert_eq!(second.previous.as_ref(), Some(&snapshot));
        assert_eq!(second.mapping, snapshot.contest_mapping());
        assert_eq!(
            store.persist(1, false, second.previous.as_ref(), &snapshot).unwrap(),
            PersistOutcome::Unchanged
        );
    }

    #[test]
    fn persist_leaves_no_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = GraphDataStore::new(dir.path());
        store
            .persist(9, true, None, &GraphSnapshot::empty())
            .unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["9_custom.json".to_string()]);
    }

    #[test]
    fn custom_flag_selects_separate_file() {
        let store = GraphDataStore::new("/var/lib/ratingsync");
        assert_eq!(store.path_for(157, false), PathBuf::from("/var/lib/ratingsync/157.json"));
        assert_eq!(
            store.path_for(157, true),
            PathBuf::from("/var/lib/ratingsync/157_custom.json")
        );
    }

    #[test]
    fn corrupt_cache_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = GraphDataStore::new(dir.path());
        std::fs::write(store.path_for(3, false), "{not json").unwrap();
        assert!(store.load(3, false).is_err());
    }
}
