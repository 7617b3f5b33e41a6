//! Codeforces adapter.
//!
//! The contest catalog comes from the public API; the user's participation
//! comes from the `contests/with/{handle}` table and is cross-referenced
//! against the catalog by contest id.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::DateTime;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use tracing::debug;

use crate::http::RequestClient;
use crate::models::{canonical_key_from_utc, ContestRecord, SiteKey, SiteSeries};
use crate::sites::{fetch_page, AdapterError, SiteAdapter, SiteFetch};
use crate::util::normalize_base_url;

const DEFAULT_BASE_URL: &str = "https://codeforces.com";

pub const SERIES_TITLE: &str = "Codeforces";

#[derive(Debug, Clone)]
pub struct CodeforcesAdapter {
    base_url: String,
}

impl CodeforcesAdapter {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
        }
    }
}

impl Default for CodeforcesAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SiteAdapter for CodeforcesAdapter {
    fn site(&self) -> SiteKey {
        SiteKey::Codeforces
    }

    async fn fetch(&self, client: &RequestClient, handle: &str) -> Result<SiteFetch, AdapterError> {
        let catalog_url = format!("{}/api/contest.list", self.base_url);
        let catalog = parse_catalog(fetch_page(client, &catalog_url).await?.text())?;

        let table_url = format!("{}/contests/with/{handle}", self.base_url);
        let page = fetch_page(client, &table_url).await?;
        let series = parse_participation(page.text(), &catalog, &self.base_url)?;
        debug!(handle, records = series.len(), "Parsed Codeforces history");
        Ok(SiteFetch::Series(vec![series]))
    }
}

#[derive(Debug, Deserialize)]
struct ContestList {
    status: String,
    #[serde(default)]
    result: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct CatalogEntry {
    id: u64,
    name: String,
    #[serde(rename = "startTimeSeconds", default)]
    start_time_seconds: Option<i64>,
}

fn parse_catalog(body: &str) -> Result<HashMap<u64, CatalogEntry>, AdapterError> {
    let list: ContestList = serde_json::from_str(body)
        .map_err(|error| AdapterError::parse(format!("invalid contest list: {error}")))?;
    if list.status != "OK" {
        return Err(AdapterError::parse(format!(
            "contest list status {}",
            list.status
        )));
    }
    Ok(list
        .result
        .into_iter()
        .map(|entry| (entry.id, entry))
        .collect())
}

fn selector(raw: &str) -> Selector {
    Selector::parse(raw).expect("valid selector")
}

fn cell_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn child_text(cell: ElementRef<'_>, child: &Selector) -> Option<String> {
    cell.select(child).next().map(cell_text)
}

fn parse_number<T: std::str::FromStr>(raw: Option<String>, column: &str) -> Result<T, AdapterError> {
    let raw = raw.ok_or_else(|| AdapterError::parse(format!("row is missing {column}")))?;
    raw.parse::<T>()
        .map_err(|_| AdapterError::parse(format!("invalid {column} {raw:?}")))
}

/// Build the single Codeforces series from the participation table.
fn parse_participation(
    page: &str,
    catalog: &HashMap<u64, CatalogEntry>,
    base_url: &str,
) -> Result<SiteSeries, AdapterError> {
    let document = Html::parse_document(page);
    let rows = selector("table.tablesorter tbody tr");
    let cells = selector("td");
    let link = selector("a");
    let span = selector("span");

    if document.select(&selector("table.tablesorter")).next().is_none() {
        return Err(AdapterError::parse("participation table not found"));
    }

    let mut series = SiteSeries::new(SERIES_TITLE);
    for row in document.select(&rows) {
        let tds: Vec<ElementRef<'_>> = row.select(&cells).collect();
        if tds.len() < 6 {
            return Err(AdapterError::parse(format!(
                "participation row has {} cells",
                tds.len()
            )));
        }

        let contest_id = tds[1]
            .select(&link)
            .next()
            .and_then(|anchor| anchor.value().attr("href"))
            .and_then(|href| href.trim_end_matches('/').rsplit('/').next())
            .and_then(|id| id.parse::<u64>().ok())
            .ok_or_else(|| AdapterError::parse("row has no contest link"))?;
        let rank: u64 = parse_number(child_text(tds[2], &link), "rank")?;
        let solved_count: u32 = parse_number(child_text(tds[3], &link), "solved count")?;
        let rating_change: i64 = parse_number(child_text(tds[4], &span), "rating change")?;
        let new_rating: i64 = parse_number(Some(cell_text(tds[5])), "new rating")?;

        let contest = catalog
            .get(&contest_id)
            .ok_or_else(|| AdapterError::parse(format!("contest {contest_id} not in catalog")))?;
        let started_at = contest
            .start_time_seconds
            .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
            .ok_or_else(|| AdapterError::parse(format!("contest {contest_id} has no start time")))?;

        series.insert(
            canonical_key_from_utc(started_at),
            ContestRecord {
                name: contest.name.clone(),
                url: format!("{base_url}/contest/{contest_id}"),
                rating: new_rating.to_string(),
                rank,
                rating_change: Some(rating_change),
                solved_count: Some(solved_count),
            },
        );
    }

    Ok(series)
}
