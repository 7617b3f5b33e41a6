use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] ratingsync_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid handle argument {0:?}, expected SITE=HANDLE")]
    InvalidHandle(String),
    #[error("User {0} is not configured")]
    UserNotConfigured(u64),
    #[error("No users configured. Run `ratingsync config add-user` first.")]
    NoUsers,
    #[error("No cached graph data for user {0}")]
    NoGraphData(u64),
    #[error("Sync failed for {0} user(s)")]
    SyncFailed(usize),
}
