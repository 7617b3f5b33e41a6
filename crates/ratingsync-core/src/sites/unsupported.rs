//! Placeholder adapter for sites without a history source.

use async_trait::async_trait;
use tracing::debug;

use crate::http::RequestClient;
use crate::models::SiteKey;
use crate::sites::{AdapterError, SiteAdapter, SiteFetch};

/// Reserved slot for a site whose rating history is not fetched yet.
///
/// Always reports `SiteFetch::Unsupported` without touching the network, so
/// the site's cached series are carried forward unchanged.
#[derive(Debug, Clone, Copy)]
pub struct UnsupportedAdapter {
    site: SiteKey,
}

impl UnsupportedAdapter {
    pub const fn new(site: SiteKey) -> Self {
        Self { site }
    }
}

#[async_trait]
impl SiteAdapter for UnsupportedAdapter {
    fn site(&self) -> SiteKey {
        self.site
    }

    async fn fetch(&self, _client: &RequestClient, handle: &str) -> Result<SiteFetch, AdapterError> {
        debug!(site = %self.site, handle, "Site has no rating history source");
        Ok(SiteFetch::Unsupported)
    }
}
