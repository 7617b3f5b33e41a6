use ratingsync_core::config::parse_site_list;
use ratingsync_core::models::{GraphSnapshot, SiteKey};
use ratingsync_core::store::PersistOutcome;
use ratingsync_core::sync::{SiteOutcome, SyncReport};
use ratingsync_core::{SyncConfig, UserEntry};
use serde::Serialize;

use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct SyncReportItem {
    pub user_id: u64,
    pub custom: bool,
    pub written: bool,
    pub records: usize,
    pub sites: Vec<SiteOutcomeItem>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SiteOutcomeItem {
    pub site: String,
    pub status: &'static str,
    pub series: usize,
    pub records: usize,
    pub detail: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SeriesSummaryItem {
    pub site: String,
    pub title: String,
    pub records: usize,
    pub latest: Option<String>,
}

/// Explicit sites win over the configured default list.
pub fn resolve_sites(explicit: &[String], config: &SyncConfig) -> Result<Vec<SiteKey>, CliError> {
    let sites = if explicit.is_empty() {
        config.site_keys()?
    } else {
        parse_site_list(explicit.iter().map(String::as_str))?
    };
    if sites.is_empty() {
        return Err(CliError::Config("No sites selected".to_string()));
    }
    Ok(sites)
}

/// All configured users, or those matching `ids` (both cache variants).
pub fn select_users(config: &SyncConfig, ids: &[u64]) -> Result<Vec<UserEntry>, CliError> {
    if config.users.is_empty() {
        return Err(CliError::NoUsers);
    }
    if ids.is_empty() {
        return Ok(config.users.clone());
    }

    let mut selected = Vec::new();
    for id in ids {
        let matches: Vec<UserEntry> = config
            .users
            .iter()
            .filter(|user| user.id == *id)
            .cloned()
            .collect();
        if matches.is_empty() {
            return Err(CliError::UserNotConfigured(*id));
        }
        selected.extend(matches);
    }
    Ok(selected)
}

/// Parse `SITE=HANDLE`.
pub fn parse_handle_arg(raw: &str) -> Result<(SiteKey, String), CliError> {
    let (site, handle) = raw
        .split_once('=')
        .ok_or_else(|| CliError::InvalidHandle(raw.to_string()))?;
    let site = site
        .parse::<SiteKey>()
        .map_err(|error| CliError::Config(error.to_string()))?;
    let handle = handle.trim();
    if handle.is_empty() {
        return Err(CliError::InvalidHandle(raw.to_string()));
    }
    Ok((site, handle.to_string()))
}

fn outcome_label(outcome: &SiteOutcome) -> String {
    match outcome {
        SiteOutcome::Fetched { series, records } => format!("{series} series/{records} records"),
        SiteOutcome::Failed(reason) => format!("failed ({reason})"),
        SiteOutcome::Unsupported => "unsupported".to_string(),
    }
}

pub fn format_report_line(report: &SyncReport) -> String {
    let persist = match report.persist {
        PersistOutcome::Written => "written",
        PersistOutcome::Unchanged => "unchanged",
    };
    let suffix = if report.custom { " (custom)" } else { "" };
    let sites = report
        .outcomes
        .iter()
        .map(|(site, outcome)| format!("{site}={}", outcome_label(outcome)))
        .collect::<Vec<_>>()
        .join(", ");
    if sites.is_empty() {
        format!("user {}{suffix}: {persist}, {} records", report.user_id, report.records)
    } else {
        format!(
            "user {}{suffix}: {persist}, {} records [{sites}]",
            report.user_id, report.records
        )
    }
}

pub fn report_to_item(report: &SyncReport) -> SyncReportItem {
    SyncReportItem {
        user_id: report.user_id,
        custom: report.custom,
        written: report.persist == PersistOutcome::Written,
        records: report.records,
        sites: report
            .outcomes
            .iter()
            .map(|(site, outcome)| match outcome {
                SiteOutcome::Fetched { series, records } => SiteOutcomeItem {
                    site: site.to_string(),
                    status: "fetched",
                    series: *series,
                    records: *records,
                    detail: None,
                },
                SiteOutcome::Failed(reason) => SiteOutcomeItem {
                    site: site.to_string(),
                    status: "failed",
                    series: 0,
                    records: 0,
                    detail: Some(reason.clone()),
                },
                SiteOutcome::Unsupported => SiteOutcomeItem {
                    site: site.to_string(),
                    status: "unsupported",
                    series: 0,
                    records: 0,
                    detail: None,
                },
            })
            .collect(),
        error: None,
    }
}

pub fn summarize_snapshot(snapshot: &GraphSnapshot) -> Vec<SeriesSummaryItem> {
    snapshot
        .iter()
        .flat_map(|(site, series)| {
            series.iter().map(move |entry| SeriesSummaryItem {
                site: site.to_string(),
                title: entry.title.clone(),
                records: entry.len(),
                latest: entry.data.keys().next_back().cloned(),
            })
        })
        .collect()
}

pub fn format_snapshot_lines(snapshot: &GraphSnapshot) -> Vec<String> {
    summarize_snapshot(snapshot)
        .into_iter()
        .map(|item| match item.latest {
            Some(latest) => format!(
                "{:<12} {:<28} {:>4} records  latest {latest}",
                item.site, item.title, item.records
            ),
            None => format!("{:<12} {:<28} {:>4} records", item.site, item.title, item.records),
        })
        .collect()
}
