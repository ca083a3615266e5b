//! Mock HTTP transport for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::transport::{HttpTransport, TransportError};

/// A recorded request for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// Mock implementation of the HttpTransport trait.
///
/// Responses are registered per URL. A registration without a query string
/// also answers requests to that URL with any query string. Unregistered
/// URLs answer with a 404 status error.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    responses: Arc<RwLock<HashMap<String, Result<String, TransportError>>>>,
    requests: Arc<RwLock<Vec<RecordedRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with `body`.
    pub async fn set_response(&self, url: &str, body: &str) {
        self.responses
            .write()
            .await
            .insert(url.to_string(), Ok(body.to_string()));
    }

    /// Answer `url` with `error`.
    pub async fn set_error(&self, url: &str, error: TransportError) {
        self.responses
            .write()
            .await
            .insert(url.to_string(), Err(error));
    }

    /// Get all recorded requests.
    pub async fn recorded_requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().await.clone()
    }

    /// Number of requests made to `url` (with or without a query string).
    pub async fn request_count(&self, url: &str) -> usize {
        self.requests
            .read()
            .await
            .iter()
            .filter(|r| r.url == url || without_query(&r.url) == url)
            .count()
    }

    /// Clear recorded requests.
    pub async fn clear_recorded(&self) {
        self.requests.write().await.clear();
    }
}

fn without_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn get_text(&self, url: &str, headers: &[(&str, &str)]) -> Result<String, TransportError> {
        self.requests.write().await.push(RecordedRequest {
            url: url.to_string(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });

        let responses = self.responses.read().await;
        responses
            .get(url)
            .or_else(|| responses.get(without_query(url)))
            .cloned()
            .unwrap_or_else(|| {
                Err(TransportError::Status {
                    status: 404,
                    message: format!("no mock response for {}", url),
                })
            })
    }
}
