//! HTTP transport abstraction.
//!
//! Every network call in the pipeline (catalogue feed, metadata service
//! configuration, per-row lookups) goes through [`HttpTransport`], so tests
//! can substitute canned responses.

mod http;

pub use http::ReqwestTransport;

use async_trait::async_trait;
use thiserror::Error;

/// Errors returned by an [`HttpTransport`].
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the client timeout.
    #[error("HTTP request timed out")]
    Timeout,

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
}

impl TransportError {
    /// HTTP status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Read-only HTTP GET capability returning the response body as text.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue a GET request with optional header overrides.
    async fn get_text(&self, url: &str, headers: &[(&str, &str)]) -> Result<String, TransportError>;
}
