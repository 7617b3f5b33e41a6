//! Graph snapshots and the title index derived from them

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{ContestRecord, SiteKey, SiteSeries};

type SiteMap = BTreeMap<SiteKey, Vec<SiteSeries>>;

/// Every series for one user, keyed by site.
///
/// A snapshot always carries exactly one (possibly empty) slot per supported
/// site, and no two series in a slot share a title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SiteMap", into = "SiteMap")]
pub struct GraphSnapshot {
    sites: SiteMap,
}

impl GraphSnapshot {
    /// A snapshot with an empty slot for every supported site.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            sites: SiteKey::ALL.into_iter().map(|site| (site, Vec::new())).collect(),
        }
    }

    /// Series currently held for `site`.
    pub fn series(&self, site: SiteKey) -> &[SiteSeries] {
        self.sites.get(&site).map_or(&[], Vec::as_slice)
    }

    /// Find a series by title within a site's slot.
    pub fn find(&self, site: SiteKey, title: &str) -> Option<&SiteSeries> {
        self.series(site).iter().find(|series| series.title == title)
    }

    /// Replace a site's slot. A later series overwrites an earlier one with
    /// the same title, keeping the earlier position.
    pub fn set_site(&mut self, site: SiteKey, series: Vec<SiteSeries>) {
        let mut deduped: Vec<SiteSeries> = Vec::with_capacity(series.len());
        for entry in series {
            if let Some(existing) = deduped.iter_mut().find(|kept| kept.title == entry.title) {
                *existing = entry;
            } else {
                deduped.push(entry);
            }
        }
        self.sites.insert(site, deduped);
    }

    pub fn iter(&self) -> impl Iterator<Item = (SiteKey, &[SiteSeries])> {
        self.sites.iter().map(|(site, series)| (*site, series.as_slice()))
    }

    /// Total records across every series.
    pub fn record_count(&self) -> usize {
        self.sites
            .values()
            .flat_map(|series| series.iter())
            .map(SiteSeries::len)
            .sum()
    }

    /// Build the title index used by the merge step.
    pub fn contest_mapping(&self) -> ContestMapping {
        ContestMapping::from_snapshot(self)
    }
}

impl Default for GraphSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<SiteMap> for GraphSnapshot {
    fn from(sites: SiteMap) -> Self {
        let mut snapshot = Self::empty();
        for (site, series) in sites {
            snapshot.set_site(site, series);
        }
        snapshot
    }
}

impl From<GraphSnapshot> for SiteMap {
    fn from(snapshot: GraphSnapshot) -> Self {
        snapshot.sites
    }
}

/// Series title → that series' records, derived from a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContestMapping(BTreeMap<String, BTreeMap<String, ContestRecord>>);

impl ContestMapping {
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> Self {
        let mut mapping = BTreeMap::new();
        for (_, series) in snapshot.iter() {
            for entry in series {
                mapping.insert(entry.title.clone(), entry.data.clone());
            }
        }
        Self(mapping)
    }

    pub fn get(&self, title: &str) -> Option<&BTreeMap<String, ContestRecord>> {
        self.0.get(title)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn series(title: &str, keys: &[&str]) -> SiteSeries {
        let mut series = SiteSeries::new(title);
        for key in keys {
            series.insert(*key, ContestRecord::new(*key, "url", "1500", 1));
        }
        series
    }

    #[test]
    fn empty_snapshot_has_a_slot_per_site() {
        let snapshot = GraphSnapshot::empty();
        assert_eq!(snapshot.iter().count(), SiteKey::ALL.len());
        assert!(snapshot.iter().all(|(_, series)| series.is_empty()));
    }

    #[test]
    fn deserializing_fills_missing_slots() {
        let snapshot: GraphSnapshot = serde_json::from_str(
            r#"{"codeforces_data": [{"title": "Codeforces", "data": {}}]}"#,
        )
        .unwrap();
        assert_eq!(snapshot.iter().count(), SiteKey::ALL.len());
        assert_eq!(snapshot.series(SiteKey::Codeforces).len(), 1);
        assert!(snapshot.series(SiteKey::Uva).is_empty());
    }

    #[test]
    fn set_site_collapses_duplicate_titles() {
        let mut snapshot = GraphSnapshot::empty();
        snapshot.set_site(
            SiteKey::HackerRank,
            vec![
                series("HackerRank - algorithms", &["a"]),
                series("HackerRank - ai", &["b"]),
                series("HackerRank - algorithms", &["c", "d"]),
            ],
        );

        let titles: Vec<&str> = snapshot
            .series(SiteKey::HackerRank)
            .iter()
            .map(|series| series.title.as_str())
            .collect();
        assert_eq!(titles, vec!["HackerRank - algorithms", "HackerRank - ai"]);
        assert_eq!(
            snapshot
                .find(SiteKey::HackerRank, "HackerRank - algorithms")
                .map(SiteSeries::len),
            Some(2)
        );
    }

    #[test]
    fn contest_mapping_indexes_every_title() {
        let mut snapshot = GraphSnapshot::empty();
        snapshot.set_site(SiteKey::Codeforces, vec![series("Codeforces", &["a", "b"])]);
        snapshot.set_site(SiteKey::CodeChef, vec![series("CodeChef Long", &["c"])]);

        let mapping = snapshot.contest_mapping();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get("Codeforces").map(BTreeMap::len), Some(2));
        assert_eq!(mapping.get("CodeChef Long").map(BTreeMap::len), Some(1));
        assert!(mapping.get("CodeChef Cook-off").is_none());
    }
}
