//! TMDB (The Movie Database) API client.
//!
//! TMDB requires a credential: either a v3 API key (sent as the `api_key`
//! query parameter) or a v4 read access token (sent as a bearer token).

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{MetadataError, MetadataMatch, MetadataService, ServiceConfig};
use crate::transport::HttpTransport;

const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// TMDB API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    /// TMDB API key or v4 read access token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL (default: https://api.themoviedb.org/3).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Response language for titles and overviews.
    #[serde(default = "default_language", skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_language() -> Option<String> {
    Some("zh-CN".to_string())
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            language: default_language(),
        }
    }
}

/// TMDB API client.
pub struct TmdbClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    api_key: Option<String>,
    language: Option<String>,
}

impl TmdbClient {
    /// Create a new TMDB client.
    ///
    /// The credential is not checked here; callers validate it before the
    /// first request (see [`super::check_credential`]).
    pub fn new(config: TmdbConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            language: config.language,
        }
    }

    fn api_key(&self) -> Result<&str, MetadataError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| MetadataError::NotConfigured("TMDB API key is required".to_string()))
    }

    /// v4 read access tokens are JWTs; v3 keys are 32 hex characters.
    fn uses_bearer_token(api_key: &str) -> bool {
        api_key.starts_with("eyJ")
    }

    /// Build a request URL with authentication and the given query parameters.
    fn build_url(&self, path: &str, params: &[(&str, String)]) -> Result<String, MetadataError> {
        let api_key = self.api_key()?;
        let mut query: Vec<String> = Vec::with_capacity(params.len() + 1);

        if !Self::uses_bearer_token(api_key) {
            query.push(format!("api_key={}", urlencoding::encode(api_key)));
        }
        for (name, value) in params {
            query.push(format!("{}={}", name, urlencoding::encode(value)));
        }

        let mut url = format!("{}{}", self.base_url, path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.join("&"));
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        what: &str,
    ) -> Result<T, MetadataError> {
        let api_key = self.api_key()?;
        let bearer = format!("Bearer {}", api_key);
        let mut headers: Vec<(&str, &str)> = vec![("Accept", "application/json")];
        if Self::uses_bearer_token(api_key) {
            headers.push(("Authorization", bearer.as_str()));
        }

        let body = self
            .transport
            .get_text(url, &headers)
            .await
            .map_err(|e| match e.status() {
                Some(401) => MetadataError::NotConfigured("Invalid TMDB API key".to_string()),
                Some(429) => MetadataError::RateLimitExceeded,
                _ => MetadataError::Transport(e),
            })?;

        serde_json::from_str(&body).map_err(|e| {
            MetadataError::ParseError(format!("Failed to parse {} response: {}", what, e))
        })
    }
}

#[async_trait]
impl MetadataService for TmdbClient {
    fn name(&self) -> &str {
        "tmdb"
    }

    fn credential(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    async fn configuration(&self) -> Result<ServiceConfig, MetadataError> {
        debug!("TMDB get configuration");

        let url = self.build_url("/configuration", &[])?;
        let response: TmdbConfigurationResponse = self.get_json(&url, "configuration").await?;

        response.try_into()
    }

    async fn search_movies(
        &self,
        query: &str,
        year: Option<u32>,
    ) -> Result<Vec<MetadataMatch>, MetadataError> {
        debug!("TMDB movie search: query='{}', year={:?}", query, year);

        let mut params: Vec<(&str, String)> = vec![("query", query.to_string())];
        if let Some(y) = year {
            params.push(("primary_release_year", y.to_string()));
        }
        if let Some(language) = self.language.as_deref().filter(|l| !l.is_empty()) {
            params.push(("language", language.to_string()));
        }

        let url = self.build_url("/search/movie", &params)?;
        let search_result: TmdbSearchResponse<TmdbMovieResult> =
            self.get_json(&url, "movie search").await?;

        Ok(search_result
            .results
            .into_iter()
            .map(|r| r.into())
            .collect())
    }
}

// ============================================================================
// TMDB API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieResult {
    id: u64,
    #[serde(default)]
    title: Option<String>,
    // TV-shaped results carry `name` instead of `title`.
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    backdrop_path: Option<String>,
    #[serde(default)]
    vote_average: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TmdbConfigurationResponse {
    images: TmdbImages,
}

#[derive(Debug, Deserialize)]
struct TmdbImages {
    #[serde(default)]
    secure_base_url: Option<String>,
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    poster_sizes: Vec<String>,
    #[serde(default)]
    backdrop_sizes: Vec<String>,
}

// ============================================================================
// Conversions
// ============================================================================

impl From<TmdbMovieResult> for MetadataMatch {
    fn from(r: TmdbMovieResult) -> Self {
        Self {
            id: r.id,
            title: r.title.or(r.name).unwrap_or_default(),
            overview: r.overview,
            release_date: r.release_date,
            poster_path: r.poster_path,
            backdrop_path: r.backdrop_path,
            vote_average: r.vote_average,
        }
    }
}

impl TryFrom<TmdbConfigurationResponse> for ServiceConfig {
    type Error = MetadataError;

    fn try_from(r: TmdbConfigurationResponse) -> Result<Self, Self::Error> {
        let image_base_url = r
            .images
            .secure_base_url
            .or(r.images.base_url)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                MetadataError::ParseError("configuration has no image base URL".to_string())
            })?;

        Ok(Self {
            image_base_url,
            poster_sizes: r.images.poster_sizes,
            backdrop_sizes: r.images.backdrop_sizes,
        })
    }
}
