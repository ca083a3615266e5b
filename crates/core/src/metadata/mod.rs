//! Metadata service integration (TMDB).
//!
//! This module provides the lookup client used to enrich catalogue rows and
//! the write-once cache of the service's image configuration.

mod config_cache;
mod tmdb;
mod types;

pub use config_cache::{check_credential, ServiceConfigCache, PLACEHOLDER_CREDENTIALS};
pub use tmdb::{TmdbClient, TmdbConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

use crate::transport::TransportError;

/// Errors that can occur when talking to the metadata service.
#[derive(Debug, Clone, Error)]
pub enum MetadataError {
    /// Transport-level failure.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing or rejected API key).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Trait for metadata lookup services.
#[async_trait]
pub trait MetadataService: Send + Sync {
    /// Short service name for logs.
    fn name(&self) -> &str;

    /// The credential calls are authenticated with, if any.
    fn credential(&self) -> Option<&str>;

    /// Fetch service-level configuration (image base URL and sizes).
    async fn configuration(&self) -> Result<ServiceConfig, MetadataError>;

    /// Search for movies by title, optionally restricted to a release year.
    ///
    /// Results are in the service's ranking order, best match first.
    async fn search_movies(
        &self,
        query: &str,
        year: Option<u32>,
    ) -> Result<Vec<MetadataMatch>, MetadataError>;
}
