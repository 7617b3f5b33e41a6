//! Per-user handle configuration

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::SiteKey;
use crate::util::normalize_text_option;

/// Mapping from `"{site}_handle"` to the user's identifier on that site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandleConfig(BTreeMap<String, String>);

impl HandleConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Set the handle for a site; blank handles remove the entry.
    pub fn set(&mut self, site: SiteKey, handle: impl Into<String>) {
        match normalize_text_option(Some(handle.into())) {
            Some(handle) => {
                self.0.insert(site.handle_key(), handle);
            }
            None => {
                self.0.remove(&site.handle_key());
            }
        }
    }

    /// The configured handle for `site`, if any.
    pub fn handle_for(&self, site: SiteKey) -> Option<&str> {
        self.0.get(&site.handle_key()).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drop blank handles and trim the rest.
    pub(crate) fn normalize(&mut self) {
        let entries = std::mem::take(&mut self.0);
        self.0 = entries
            .into_iter()
            .filter_map(|(key, value)| normalize_text_option(Some(value)).map(|value| (key, value)))
            .collect();
    }
}

impl FromIterator<(SiteKey, String)> for HandleConfig {
    fn from_iter<I: IntoIterator<Item = (SiteKey, String)>>(iter: I) -> Self {
        let mut handles = Self::new();
        for (site, handle) in iter {
            handles.set(site, handle);
        }
        handles
    }
}
