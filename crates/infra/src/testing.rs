//! Scripted transport for exercising the SDK without a network

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::api::errors::ApiError;
use crate::http::{HttpRequest, HttpResponse, HttpTransport};

/// Transport that replays queued responses in order and records every request
///
/// Clones share the same queue and log, so a test can keep one handle while
/// the client owns another. An exhausted queue answers with a network error.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<VecDeque<Result<HttpResponse, String>>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, status: u16, body: impl Into<Vec<u8>>) -> &Self {
        self.enqueue(Ok(HttpResponse::new(status, body)))
    }

    pub fn push_json(&self, status: u16, body: &Value) -> &Self {
        let mut response = HttpResponse::new(status, body.to_string());
        response.headers.push(("Content-Type".into(), "application/json".into()));
        self.enqueue(Ok(response))
    }

    /// Queue a connection-level failure
    pub fn push_network_error(&self, message: impl Into<String>) -> &Self {
        self.enqueue(Err(message.into()))
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().map(|log| log.clone()).unwrap_or_default()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().ok().and_then(|log| log.last().cloned())
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|log| log.len()).unwrap_or_default()
    }

    fn enqueue(&self, response: Result<HttpResponse, String>) -> &Self {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(response);
        }
        self
    }
}

impl HttpTransport for MockTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        if let Ok(mut log) = self.requests.lock() {
            log.push(request);
        }

        let next = self.responses.lock().ok().and_then(|mut queue| queue.pop_front());
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(ApiError::Network(message)),
            None => Err(ApiError::Network("no scripted response left".into())),
        }
    }
}
