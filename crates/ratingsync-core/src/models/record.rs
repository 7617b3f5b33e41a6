//! Contest records and the series that group them

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One contest's outcome for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestRecord {
    /// Contest display name
    pub name: String,
    /// Canonical contest URL
    pub url: String,
    /// Rating as reported by the site, kept as text
    pub rating: String,
    /// Rank in the contest
    pub rank: u64,
    /// Rating delta, for sites that report it
    #[serde(
        rename = "ratingChange",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub rating_change: Option<i64>,
    /// Number of problems solved, for sites that report it
    #[serde(
        rename = "solvedCount",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub solved_count: Option<u32>,
}

impl ContestRecord {
    /// Create a record without the optional per-site fields
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        rating: impl Into<String>,
        rank: u64,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            rating: rating.into(),
            rank,
            rating_change: None,
            solved_count: None,
        }
    }
}

/// A titled group of records keyed by canonical timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSeries {
    pub title: String,
    pub data: BTreeMap<String, ContestRecord>,
}

impl SiteSeries {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            data: BTreeMap::new(),
        }
    }

    /// Insert a record, overwriting any record already at `timestamp_key`.
    pub fn insert(
        &mut self,
        timestamp_key: impl Into<String>,
        record: ContestRecord,
    ) -> Option<ContestRecord> {
        self.data.insert(timestamp_key.into(), record)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
