use ratingsync_core::store::GraphDataStore;
use ratingsync_core::SyncConfig;

use crate::commands::common::format_snapshot_lines;
use crate::error::CliError;

pub fn run_show(config: &SyncConfig, user_id: u64, custom: bool, as_json: bool) -> Result<(), CliError> {
    let store = GraphDataStore::new(config.graph_data_dir.clone());
    let snapshot = store
        .load(user_id, custom)?
        .previous
        .ok_or(CliError::NoGraphData(user_id))?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let lines = format_snapshot_lines(&snapshot);
    if lines.is_empty() {
        println!("No series recorded for user {user_id}.");
    }
    for line in lines {
        println!("{line}");
    }
    Ok(())
}
