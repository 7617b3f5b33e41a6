//! ratingsync-core - Core library for ratingsync
//!
//! This crate fetches a user's contest history from competitive-programming
//! sites, normalizes it into per-site rating series and merges it into a
//! cached graph snapshot without ever letting a partial fetch shrink history.

pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod sites;
pub mod store;
pub mod sync;
pub mod util;

pub use config::{SyncConfig, UserEntry};
pub use error::{Error, Result};
pub use models::{ContestMapping, ContestRecord, GraphSnapshot, HandleConfig, SiteKey, SiteSeries};
pub use sync::{SyncOrchestrator, SyncReport};
