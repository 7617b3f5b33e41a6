//! Outbound HTTP with bounded retry and response classification.
//!
//! `RequestClient` owns the retry policy; the network itself sits behind the
//! `HttpTransport` trait so the policy can be exercised without sockets.

mod transport;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::SyncConfig;
use crate::error::Result;

pub use transport::ReqwestTransport;

/// Why a GET did not produce a usable response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FailureKind {
    /// The transport failed before any response arrived
    #[error("server failure")]
    ServerFailure,
    /// The site answered 404 or 400 (unknown handle)
    #[error("not found")]
    NotFound,
    /// Attempts ran out without a definitive answer
    #[error("other failure")]
    OtherFailure,
}

/// Network-layer error reported by a transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);

/// A GET request description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub params: Vec<(String, String)>,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            params: Vec::new(),
            timeout: Duration::from_secs(20),
        }
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.body
    }
}

/// Sends a single GET and reports whatever status came back.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, TransportError>;
}

/// GET client applying the retry and classification policy.
///
/// * 200 is returned as-is.
/// * 404 and 400 yield `NotFound` immediately.
/// * Any other status is retried until `max_tries` attempts are used, then
///   yields `OtherFailure`.
/// * A transport error yields `ServerFailure` immediately, without consuming
///   further attempts.
///
/// No delay is applied between attempts.
#[derive(Clone)]
pub struct RequestClient {
    transport: Arc<dyn HttpTransport>,
    max_tries: u32,
    timeout: Duration,
}

impl std::fmt::Debug for RequestClient {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("RequestClient")
            .field("max_tries", &self.max_tries)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl RequestClient {
    pub fn new(transport: Arc<dyn HttpTransport>, max_tries: u32, timeout: Duration) -> Self {
        Self {
            transport,
            max_tries: max_tries.max(1),
            timeout,
        }
    }

    /// Build a client backed by reqwest from validated configuration.
    pub fn from_config(config: &SyncConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(config.proxy.as_deref())?;
        Ok(Self::new(
            Arc::new(transport),
            config.max_tries,
            config.request_timeout(),
        ))
    }

    pub const fn max_tries(&self) -> u32 {
        self.max_tries
    }

    /// A GET request for `url` carrying this client's default timeout.
    pub fn request(&self, url: impl Into<String>) -> HttpRequest {
        HttpRequest::get(url).timeout(self.timeout)
    }

    /// Shorthand for a plain GET with no headers or params.
    pub async fn get_url(&self, url: &str) -> std::result::Result<HttpResponse, FailureKind> {
        self.get(&self.request(url)).await
    }

    pub async fn get(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, FailureKind> {
        for attempt in 1..=self.max_tries {
            let response = match self.transport.send(request).await {
                Ok(response) => response,
                Err(error) => {
                    warn!(url = %request.url, attempt, %error, "Request failed at transport level");
                    return Err(FailureKind::ServerFailure);
                }
            };

            match response.status {
                200 => return Ok(response),
                400 | 404 => {
                    debug!(url = %request.url, status = response.status, "Site reported not found");
                    return Err(FailureKind::NotFound);
                }
                status => {
                    debug!(url = %request.url, attempt, status, "Unexpected status, retrying");
                }
            }
        }

        warn!(url = %request.url, attempts = self.max_tries, "Request attempts exhausted");
        Err(FailureKind::OtherFailure)
    }
}
