//! Site adapters.
//!
//! Each adapter fetches one site's contest history for a handle and
//! normalizes it into titled series. Failures are reported as values so the
//! orchestrator can leave that site's slot untouched for the round.

mod codechef;
mod codeforces;
mod hackerrank;
mod payload;
mod registry;
mod unsupported;

use async_trait::async_trait;
use thiserror::Error;

use crate::http::{FailureKind, HttpResponse, RequestClient};
use crate::models::{SiteKey, SiteSeries};

pub use codechef::CodeChefAdapter;
pub use codeforces::CodeforcesAdapter;
pub use hackerrank::HackerRankAdapter;
pub use registry::AdapterRegistry;
pub use unsupported::UnsupportedAdapter;

/// Result of a successful adapter run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteFetch {
    /// Freshly normalized series for the site's slot
    Series(Vec<SiteSeries>),
    /// The site is a reserved extension point and contributes nothing
    Unsupported,
}

/// Why an adapter produced nothing this round.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    #[error("request to {url} failed: {kind}")]
    Request { url: String, kind: FailureKind },
    #[error("unexpected payload: {0}")]
    Parse(String),
}

impl AdapterError {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

/// Fetches and normalizes one site's contest history.
#[async_trait]
pub trait SiteAdapter: Send + Sync {
    /// The snapshot slot this adapter fills.
    fn site(&self) -> SiteKey;

    async fn fetch(&self, client: &RequestClient, handle: &str) -> Result<SiteFetch, AdapterError>;
}

async fn fetch_page(client: &RequestClient, url: &str) -> Result<HttpResponse, AdapterError> {
    client
        .get_url(url)
        .await
        .map_err(|kind| AdapterError::Request {
            url: url.to_string(),
            kind,
        })
}
