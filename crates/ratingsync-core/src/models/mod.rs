//! Data models for ratingsync

mod handles;
mod record;
mod site;
mod snapshot;
mod timestamp;

pub use handles::HandleConfig;
pub use record::{ContestRecord, SiteSeries};
pub use site::{SiteKey, UnknownSite};
pub use snapshot::{ContestMapping, GraphSnapshot};
pub use timestamp::{canonical_key_from_naive, canonical_key_from_utc, canonical_offset, TIMESTAMP_KEY_FORMAT};
