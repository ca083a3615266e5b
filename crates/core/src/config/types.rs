use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::metadata::TmdbConfig;
use crate::normalize::{NormalizeOptions, UnmatchedPolicy};

/// Default catalogue feed: the Criterion Collection master list.
pub const DEFAULT_FEED_URL: &str =
    "https://raw.githubusercontent.com/arrismo/criterioncollection/main/data-raw/criterion.csv";

/// Root configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub collection: CollectionConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Outbound HTTP client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// Catalogue feed configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedConfig {
    /// URL of the CSV catalogue feed
    #[serde(default = "default_feed_url")]
    pub url: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
        }
    }
}

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}

/// Page and record shaping
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CollectionConfig {
    /// Page size used when a request does not give one (default: 20)
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    /// Optional upper bound on requested page sizes (default: unbounded)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_page_size: Option<usize>,
    /// Handling of rows without a metadata match (default: drop)
    #[serde(default)]
    pub unmatched: UnmatchedPolicy,
    #[serde(default = "default_poster_size")]
    pub poster_size: String,
    #[serde(default = "default_backdrop_size")]
    pub backdrop_size: String,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: None,
            unmatched: UnmatchedPolicy::default(),
            poster_size: default_poster_size(),
            backdrop_size: default_backdrop_size(),
        }
    }
}

fn default_page_size() -> usize {
    20
}

fn default_poster_size() -> String {
    "w500".to_string()
}

fn default_backdrop_size() -> String {
    "w780".to_string()
}

impl From<&CollectionConfig> for NormalizeOptions {
    fn from(c: &CollectionConfig) -> Self {
        Self {
            unmatched: c.unmatched,
            poster_size: c.poster_size.clone(),
            backdrop_size: c.backdrop_size.clone(),
            ..Default::default()
        }
    }
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub feed: FeedConfig,
    pub tmdb: SanitizedTmdbConfig,
    pub collection: CollectionConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTmdbConfig {
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub api_key_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            http: config.http.clone(),
            feed: config.feed.clone(),
            tmdb: SanitizedTmdbConfig {
                base_url: config.tmdb.base_url.clone(),
                language: config.tmdb.language.clone(),
                api_key_configured: config
                    .tmdb
                    .api_key
                    .as_deref()
                    .is_some_and(|k| !k.trim().is_empty()),
            },
            collection: config.collection.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.feed.url, DEFAULT_FEED_URL);
        assert_eq!(config.collection.default_page_size, 20);
        assert_eq!(config.collection.unmatched, UnmatchedPolicy::Drop);
        assert_eq!(config.tmdb.base_url, "https://api.themoviedb.org/3");
    }

    #[test]
    fn test_sanitized_config_redacts_api_key() {
        let mut config = Config::default();
        config.tmdb.api_key = Some("secret-key".to_string());

        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.tmdb.api_key_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("secret-key"));
    }

    #[test]
    fn test_normalize_options_from_collection_config() {
        let collection = CollectionConfig {
            unmatched: UnmatchedPolicy::Placeholder,
            poster_size: "w342".to_string(),
            ..Default::default()
        };
        let options = NormalizeOptions::from(&collection);
        assert_eq!(options.unmatched, UnmatchedPolicy::Placeholder);
        assert_eq!(options.poster_size, "w342");
        assert_eq!(options.backdrop_size, "w780");
    }
}
