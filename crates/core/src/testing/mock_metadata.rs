//! Mock metadata service for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use super::fixtures;
use crate::metadata::{MetadataError, MetadataMatch, MetadataService, ServiceConfig};

/// A recorded search call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSearch {
    pub query: String,
    pub year: Option<u32>,
}

/// Mock implementation of the MetadataService trait.
///
/// Searches match movies whose title contains the query (case-insensitive)
/// and, when a year is given, whose release year equals it. Results come
/// back in insertion order. Clones share state.
#[derive(Debug, Clone)]
pub struct MockMetadataService {
    credential: Option<String>,
    config: Arc<RwLock<ServiceConfig>>,
    movies: Arc<RwLock<Vec<MetadataMatch>>>,
    failing_titles: Arc<RwLock<HashMap<String, MetadataError>>>,
    delays: Arc<RwLock<HashMap<String, Duration>>>,
    next_error: Arc<RwLock<Option<MetadataError>>>,
    searches: Arc<RwLock<Vec<RecordedSearch>>>,
    configuration_calls: Arc<RwLock<usize>>,
}

impl MockMetadataService {
    pub fn new() -> Self {
        Self {
            credential: Some("mock-api-key".to_string()),
            config: Arc::new(RwLock::new(fixtures::service_config())),
            movies: Arc::new(RwLock::new(Vec::new())),
            failing_titles: Arc::new(RwLock::new(HashMap::new())),
            delays: Arc::new(RwLock::new(HashMap::new())),
            next_error: Arc::new(RwLock::new(None)),
            searches: Arc::new(RwLock::new(Vec::new())),
            configuration_calls: Arc::new(RwLock::new(0)),
        }
    }

    /// Replace the credential reported by the service.
    pub fn with_credential(mut self, credential: Option<&str>) -> Self {
        self.credential = credential.map(str::to_string);
        self
    }

    pub async fn set_config(&self, config: ServiceConfig) {
        *self.config.write().await = config;
    }

    pub async fn add_movie(&self, movie: MetadataMatch) {
        self.movies.write().await.push(movie);
    }

    pub async fn set_movies(&self, movies: Vec<MetadataMatch>) {
        *self.movies.write().await = movies;
    }

    /// Make every search for `title` fail with `error`.
    pub async fn fail_title(&self, title: &str, error: MetadataError) {
        self.failing_titles
            .write()
            .await
            .insert(title.to_string(), error);
    }

    /// Delay every search for `title` by `delay`.
    pub async fn set_delay(&self, title: &str, delay: Duration) {
        self.delays.write().await.insert(title.to_string(), delay);
    }

    /// Fail the next call (configuration or search) with `error`.
    pub async fn set_next_error(&self, error: MetadataError) {
        *self.next_error.write().await = Some(error);
    }

    pub async fn recorded_queries(&self) -> Vec<RecordedSearch> {
        self.searches.read().await.clone()
    }

    pub async fn query_count(&self) -> usize {
        self.searches.read().await.len()
    }

    pub async fn configuration_calls(&self) -> usize {
        *self.configuration_calls.read().await
    }

    async fn take_next_error(&self) -> Option<MetadataError> {
        self.next_error.write().await.take()
    }
}

impl Default for MockMetadataService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataService for MockMetadataService {
    fn name(&self) -> &str {
        "mock"
    }

    fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    async fn configuration(&self) -> Result<ServiceConfig, MetadataError> {
        *self.configuration_calls.write().await += 1;

        if let Some(error) = self.take_next_error().await {
            return Err(error);
        }

        Ok(self.config.read().await.clone())
    }

    async fn search_movies(
        &self,
        query: &str,
        year: Option<u32>,
    ) -> Result<Vec<MetadataMatch>, MetadataError> {
        self.searches.write().await.push(RecordedSearch {
            query: query.to_string(),
            year,
        });

        if let Some(error) = self.take_next_error().await {
            return Err(error);
        }

        let delay = self.delays.read().await.get(query).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.failing_titles.read().await.get(query) {
            return Err(error.clone());
        }

        let needle = query.to_lowercase();
        Ok(self
            .movies
            .read()
            .await
            .iter()
            .filter(|m| m.title.to_lowercase().contains(&needle))
            .filter(|m| year.is_none() || m.year() == year)
            .cloned()
            .collect())
    }
}
