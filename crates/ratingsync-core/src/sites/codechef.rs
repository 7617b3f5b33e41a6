//! CodeChef adapter.
//!
//! The profile page embeds the full rating history as a `var all_rating`
//! array literal. It is extracted as text and decoded strictly as JSON data.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::http::RequestClient;
use crate::models::{canonical_key_from_naive, ContestRecord, SiteKey, SiteSeries, TIMESTAMP_KEY_FORMAT};
use crate::sites::payload::{text_or_number, unsigned_from_text_or_number};
use crate::sites::{fetch_page, AdapterError, SiteAdapter, SiteFetch};
use crate::util::normalize_base_url;

const DEFAULT_BASE_URL: &str = "https://www.codechef.com";

pub const LONG_TITLE: &str = "CodeChef Long";
pub const COOKOFF_TITLE: &str = "CodeChef Cook-off";
pub const LUNCHTIME_TITLE: &str = "CodeChef Lunchtime";

#[derive(Debug, Clone)]
pub struct CodeChefAdapter {
    base_url: String,
}

impl CodeChefAdapter {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
        }
    }
}

impl Default for CodeChefAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SiteAdapter for CodeChefAdapter {
    fn site(&self) -> SiteKey {
        SiteKey::CodeChef
    }

    async fn fetch(&self, client: &RequestClient, handle: &str) -> Result<SiteFetch, AdapterError> {
        let url = format!("{}/users/{handle}", self.base_url);
        let response = fetch_page(client, &url).await?;
        let series = parse_profile(response.text(), &self.base_url)?;
        debug!(handle, records = series.iter().map(SiteSeries::len).sum::<usize>(), "Parsed CodeChef history");
        Ok(SiteFetch::Series(series))
    }
}

#[derive(Debug, Deserialize)]
struct RatingEntry {
    code: String,
    name: String,
    end_date: String,
    #[serde(deserialize_with = "text_or_number")]
    rating: String,
    #[serde(deserialize_with = "unsigned_from_text_or_number")]
    rank: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContestKind {
    Long,
    CookOff,
    Lunchtime,
}

fn classify(code: &str) -> ContestKind {
    if code.contains("COOK") {
        ContestKind::CookOff
    } else if code.contains("LTIME") {
        ContestKind::Lunchtime
    } else {
        ContestKind::Long
    }
}

fn extract_rating_literal(page: &str) -> Option<&str> {
    let re = Regex::new(r"(?s)var\s+all_rating\s*=\s*(\[.*?\])\s*;").expect("Invalid regex");
    re.captures(page)
        .and_then(|captures| captures.get(1))
        .map(|literal| literal.as_str())
}

/// Split the embedded rating history into the three fixed series.
fn parse_profile(page: &str, base_url: &str) -> Result<Vec<SiteSeries>, AdapterError> {
    let literal = extract_rating_literal(page)
        .ok_or_else(|| AdapterError::parse("profile page has no all_rating array"))?;
    let entries: Vec<RatingEntry> = serde_json::from_str(literal)
        .map_err(|error| AdapterError::parse(format!("invalid all_rating array: {error}")))?;

    let mut long = SiteSeries::new(LONG_TITLE);
    let mut cookoff = SiteSeries::new(COOKOFF_TITLE);
    let mut lunchtime = SiteSeries::new(LUNCHTIME_TITLE);

    for entry in entries {
        let end_date = NaiveDateTime::parse_from_str(entry.end_date.trim(), TIMESTAMP_KEY_FORMAT)
            .map_err(|error| {
                AdapterError::parse(format!("invalid end_date {:?}: {error}", entry.end_date))
            })?;
        let target = match classify(&entry.code) {
            ContestKind::Long => &mut long,
            ContestKind::CookOff => &mut cookoff,
            ContestKind::Lunchtime => &mut lunchtime,
        };
        target.insert(
            canonical_key_from_naive(end_date),
            ContestRecord::new(
                entry.name,
                format!("{base_url}/{}", entry.code),
                entry.rating,
                entry.rank,
            ),
        );
    }

    Ok(vec![long, cookoff, lunchtime])
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::http::testing::ScriptedTransport;
    use crate::http::FailureKind;
    use pretty_assertions::assert_eq;

    const BASE: &str = "https://codechef.test";

    fn page(array: &str) -> String {
        format!(
            "<html><script>var foo = 1;\nvar all_rating = {array};\nvar other = [];</script></html>"
        )
    }

    #[test]
    fn classify_matches_code_patterns() {
        assert_eq!(classify("COOK82"), ContestKind::CookOff);
        assert_eq!(classify("LTIME45"), ContestKind::Lunchtime);
        assert_eq!(classify("JAN17"), ContestKind::Long);
    }

    #[test]
    fn parse_profile_partitions_into_three_series() {
        let body = page(
            r#"[
              {"code": "JAN17", "name": "January Challenge 2017", "end_date": "2017-01-16 15:00:00", "rating": "1850", "rank": "412"},
              {"code": "COOK78", "name": "January Cook-Off 2017", "end_date": "2017-01-22 23:30:00", "rating": 1875, "rank": 120},
              {"code": "LTIME44", "name": "January Lunchtime 2017", "end_date": "2017-01-28 22:00:00", "rating": "1860", "rank": "300"},
              {"code": "FEB17", "name": "February Challenge 2017", "end_date": "2017-02-13 15:00:00", "rating": "1901", "rank": "205"}
            ]"#,
        );

        let series = parse_profile(&body, BASE).unwrap();
        let titles: Vec<&str> = series.iter().map(|entry| entry.title.as_str()).collect();
        assert_eq!(titles, vec![LONG_TITLE, COOKOFF_TITLE, LUNCHTIME_TITLE]);
        assert_eq!(series[0].len(), 2);
        assert_eq!(series[1].len(), 1);
        assert_eq!(series[2].len(), 1);

        let cookoff = &series[1].data["2017-01-22 23:30:00"];
        assert_eq!(cookoff.name, "January Cook-Off 2017");
        assert_eq!(cookoff.url, "https://codechef.test/COOK78");
        assert_eq!(cookoff.rating, "1875");
        assert_eq!(cookoff.rank, 120);
        assert_eq!(cookoff.rating_change, None);
    }

    #[test]
    fn parse_profile_rejects_missing_or_malformed_arrays() {
        assert!(matches!(
            parse_profile("<html>no ratings here</html>", BASE),
            Err(AdapterError::Parse(_))
        ));
        assert!(matches!(
            parse_profile(&page(r#"[{"code": "JAN17"}]"#), BASE),
            Err(AdapterError::Parse(_))
        ));
        assert!(matches!(
            parse_profile(
                &page(r#"[{"code": "JAN17", "name": "x", "end_date": "16/01/2017", "rating": "1", "rank": "1"}]"#),
                BASE
            ),
            Err(AdapterError::Parse(_))
        ));
    }

    #[test]
    fn script_text_is_never_evaluated() {
        let body = page(r#"[{"code": "JAN17", "name": alert(1), "end_date": "2017-01-16 15:00:00", "rating": "1", "rank": "1"}]"#);
        assert!(matches!(parse_profile(&body, BASE), Err(AdapterError::Parse(_))));
    }

    #[tokio::test]
    async fn fetch_reports_request_failures() {
        let transport = Arc::new(ScriptedTransport::new());
        let client = RequestClient::new(transport.clone(), 2, Duration::from_secs(1));
        let adapter = CodeChefAdapter::with_base_url(BASE);

        let error = adapter.fetch(&client, "ghost").await.unwrap_err();
        assert_eq!(
            error,
            AdapterError::Request {
                url: "https://codechef.test/users/ghost".to_string(),
                kind: FailureKind::NotFound,
            }
        );
    }

    #[tokio::test]
    async fn fetch_returns_series_for_profile() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_ok(
            "https://codechef.test/users/tryingtocode",
            &page(r#"[{"code": "COOK82", "name": "May Cook-Off", "end_date": "2017-05-21 23:30:00", "rating": "1700", "rank": "88"}]"#),
        );
        let client = RequestClient::new(transport.clone(), 1, Duration::from_secs(1));

        let fetched = CodeChefAdapter::with_base_url(BASE)
            .fetch(&client, "tryingtocode")
            .await
            .unwrap();
        let SiteFetch::Series(series) = fetched else {
            panic!("expected series");
        };
        assert_eq!(series.len(), 3);
        assert_eq!(series[1].len(), 1);
    }
}
