//! HackerRank adapter.
//!
//! One API call returns every rating-history category; each category
//! becomes its own series. Event dates are UTC and shifted to the canonical
//! zone.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::http::RequestClient;
use crate::models::{canonical_key_from_utc, ContestRecord, SiteKey, SiteSeries};
use crate::sites::payload::{text_or_number, unsigned_from_text_or_number};
use crate::sites::{fetch_page, AdapterError, SiteAdapter, SiteFetch};
use crate::util::normalize_base_url;

const DEFAULT_BASE_URL: &str = "https://www.hackerrank.com";

#[derive(Debug, Clone)]
pub struct HackerRankAdapter {
    base_url: String,
}

impl HackerRankAdapter {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
        }
    }
}

impl Default for HackerRankAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SiteAdapter for HackerRankAdapter {
    fn site(&self) -> SiteKey {
        SiteKey::HackerRank
    }

    async fn fetch(&self, client: &RequestClient, handle: &str) -> Result<SiteFetch, AdapterError> {
        let url = format!(
            "{}/rest/hackers/{handle}/rating_histories_elo",
            self.base_url
        );
        let response = fetch_page(client, &url).await?;
        let series = parse_histories(response.text(), &self.base_url)?;
        debug!(handle, categories = series.len(), "Parsed HackerRank history");
        Ok(SiteFetch::Series(series))
    }
}

#[derive(Debug, Deserialize)]
struct RatingHistories {
    models: Vec<CategoryHistory>,
}

#[derive(Debug, Deserialize)]
struct CategoryHistory {
    category: String,
    #[serde(default)]
    events: Vec<RatingEvent>,
}

#[derive(Debug, Deserialize)]
struct RatingEvent {
    date: String,
    contest_name: String,
    contest_slug: String,
    #[serde(deserialize_with = "text_or_number")]
    rating: String,
    #[serde(deserialize_with = "unsigned_from_text_or_number")]
    rank: u64,
}

pub fn series_title(category: &str) -> String {
    format!("HackerRank - {category}")
}

fn parse_histories(body: &str, base_url: &str) -> Result<Vec<SiteSeries>, AdapterError> {
    let histories: RatingHistories = serde_json::from_str(body)
        .map_err(|error| AdapterError::parse(format!("invalid rating histories: {error}")))?;

    histories
        .models
        .into_iter()
        .map(|category| -> Result<SiteSeries, AdapterError> {
            let mut series = SiteSeries::new(series_title(&category.category));
            for event in category.events {
                let happened_at = DateTime::parse_from_rfc3339(event.date.trim())
                    .map_err(|error| {
                        AdapterError::parse(format!("invalid event date {:?}: {error}", event.date))
                    })?
                    .with_timezone(&Utc);
                series.insert(
                    canonical_key_from_utc(happened_at),
                    ContestRecord::new(
                        event.contest_name,
                        format!("{base_url}/{}", event.contest_slug),
                        event.rating,
                        event.rank,
                    ),
                );
            }
            Ok(series)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::http::testing::ScriptedTransport;
    use pretty_assertions::assert_eq;

    const BASE: &str = "https://hackerrank.test";

    const HISTORIES: &str = r#"{
      "models": [
        {
          "category": "algorithms",
          "events": [
            {"date": "2016-05-01T20:00:00.000Z", "contest_name": "World CodeSprint", "contest_slug": "world-codesprint", "rating": 1532.25, "rank": 410},
            {"date": "2016-06-12T10:15:00.000Z", "contest_name": "101 Hack", "contest_slug": "101hack39", "rating": "1610", "rank": "98"}
          ]
        },
        {"category": "ai", "events": []}
      ]
    }"#;

    #[test]
    fn each_category_becomes_a_series() {
        let series = parse_histories(HISTORIES, BASE).unwrap();
        let titles: Vec<&str> = series.iter().map(|entry| entry.title.as_str()).collect();
        assert_eq!(titles, vec!["HackerRank - algorithms", "HackerRank - ai"]);
        assert_eq!(series[0].len(), 2);
        assert!(series[1].is_empty());
    }

    #[test]
    fn event_dates_are_shifted_into_canonical_zone() {
        let series = parse_histories(HISTORIES, BASE).unwrap();
        let keys: Vec<&str> = series[0].data.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["2016-05-02 01:30:00", "2016-06-12 15:45:00"]);

        let record = &series[0].data["2016-05-02 01:30:00"];
        assert_eq!(record.url, "https://hackerrank.test/world-codesprint");
        assert_eq!(record.rating, "1532.25");
        assert_eq!(record.rank, 410);
    }

    #[test]
    fn schema_mismatch_is_a_parse_failure() {
        assert!(parse_histories(r#"{"models": [{"events": []}]}"#, BASE).is_err());
        assert!(parse_histories(
            r#"{"models": [{"category": "ai", "events": [{"date": "yesterday", "contest_name": "x", "contest_slug": "x", "rating": 1, "rank": 1}]}]}"#,
            BASE
        )
        .is_err());
    }

    #[tokio::test]
    async fn fetch_uses_rating_history_endpoint() {
        let transport = Arc::new(ScriptedTransport::new());
        let url = "https://hackerrank.test/rest/hackers/darkshadows/rating_histories_elo";
        transport.push_ok(url, HISTORIES);
        let client = RequestClient::new(transport.clone(), 1, Duration::from_secs(1));

        let fetched = HackerRankAdapter::with_base_url(BASE)
            .fetch(&client, "darkshadows")
            .await
            .unwrap();
        assert!(matches!(fetched, SiteFetch::Series(series) if series.len() == 2));
        assert_eq!(transport.calls(url), 1);
    }
}
