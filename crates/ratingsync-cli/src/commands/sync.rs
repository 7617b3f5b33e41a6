use ratingsync_core::{SyncConfig, SyncOrchestrator};
use tracing::info;

use crate::commands::common::{
    format_report_line, report_to_item, resolve_sites, select_users, SyncReportItem,
};
use crate::error::CliError;

pub async fn run_sync(
    config: &SyncConfig,
    sites: &[String],
    user_ids: &[u64],
    as_json: bool,
) -> Result<(), CliError> {
    let sites = resolve_sites(sites, config)?;
    let users = select_users(config, user_ids)?;
    let orchestrator = SyncOrchestrator::from_config(config)?;
    info!(users = users.len(), sites = sites.len(), "Starting sync");

    let results = orchestrator.sync_all(&users, &sites).await;
    let mut failures = 0usize;
    let mut items = Vec::with_capacity(results.len());

    for ((user_id, result), user) in results.into_iter().zip(&users) {
        match result {
            Ok(report) => {
                if as_json {
                    items.push(report_to_item(&report));
                } else {
                    println!("{}", format_report_line(&report));
                }
            }
            Err(error) => {
                failures += 1;
                if as_json {
                    items.push(SyncReportItem {
                        user_id,
                        custom: user.custom,
                        written: false,
                        records: 0,
                        sites: Vec::new(),
                        error: Some(error.to_string()),
                    });
                } else {
                    println!("user {user_id}: error: {error}");
                }
            }
        }
    }

    if as_json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    }

    if failures > 0 {
        return Err(CliError::SyncFailed(failures));
    }
    Ok(())
}
