//! Scripted transport for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::http::{HttpRequest, HttpResponse, HttpTransport, TransportError};

type Scripted = Result<HttpResponse, TransportError>;

/// Replays queued responses per URL. An exhausted or unknown URL answers 404.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<HashMap<String, VecDeque<Scripted>>>,
    sent: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, url: &str, response: Scripted) {
        self.responses
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(response);
    }

    pub fn push_ok(&self, url: &str, body: &str) {
        self.push(url, Ok(HttpResponse::new(200, body)));
    }

    pub fn requests(&self, url: &str) -> Vec<HttpRequest> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|request| request.url == url)
            .cloned()
            .collect()
    }

    pub fn calls(&self, url: &str) -> usize {
        self.requests(url).len()
    }

    pub fn total_calls(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.sent.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .get_mut(&request.url)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(HttpResponse::new(404, "")))
    }
}
