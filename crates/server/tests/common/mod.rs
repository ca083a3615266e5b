//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock dependencies injected, enabling E2E testing without network
//! access.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use reelfeed_core::{
    testing::{MockMetadataService, MockTransport},
    CatalogueRow, CollectionConfig, CollectionPager, Config, FeedCache, FeedConfig, ServerConfig,
    TmdbConfig, UnmatchedPolicy,
};
use reelfeed_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use reelfeed_core::testing::fixtures;

/// Feed URL served by the mock transport.
pub const FEED_URL: &str = "https://feed.test/criterion.csv";

/// Test fixture for E2E testing with mock dependencies.
///
/// Provides an in-process server with fully controllable mocks for:
/// - The catalogue feed (MockTransport)
/// - TMDB (MockMetadataService)
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_first_page() {
///     let fixture = TestFixture::new().await;
///     fixture.set_feed(&[fixtures::catalogue_row(1, "Grand Illusion", "1937")]).await;
///
///     let response = fixture.get("/api/v1/collection?page=1").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock transport - serves the catalogue feed
    pub transport: MockTransport,
    /// Mock metadata service - configure TMDB responses
    pub metadata: MockMetadataService,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let transport = MockTransport::new();
        let metadata = MockMetadataService::new().with_credential(test_config.api_key.as_deref());

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            feed: FeedConfig {
                url: FEED_URL.to_string(),
            },
            tmdb: TmdbConfig {
                api_key: test_config.api_key.clone(),
                ..Default::default()
            },
            collection: CollectionConfig {
                unmatched: test_config.unmatched,
                ..Default::default()
            },
            ..Default::default()
        };

        let pager = CollectionPager::new(
            FeedCache::new(Arc::new(transport.clone()), FEED_URL),
            Arc::new(metadata.clone()),
            config.collection.clone(),
        );

        let state = Arc::new(AppState::new(config, Arc::new(pager)));
        let router = create_router(state);

        Self {
            router,
            transport,
            metadata,
        }
    }

    /// Serve `rows` as the catalogue feed.
    pub async fn set_feed(&self, rows: &[CatalogueRow]) {
        self.transport
            .set_response(FEED_URL, &fixtures::catalogue_csv(rows))
            .await;
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body, text }
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    /// TMDB credential reported by the mock service
    pub api_key: Option<String>,
    /// Handling of rows without a match
    pub unmatched: UnmatchedPolicy,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_key: Some("test-api-key".to_string()),
            unmatched: UnmatchedPolicy::Drop,
        }
    }
}

impl TestConfig {
    /// Create config keeping unmatched rows as placeholders.
    pub fn with_placeholders() -> Self {
        Self {
            unmatched: UnmatchedPolicy::Placeholder,
            ..Default::default()
        }
    }

    /// Create config without a TMDB credential.
    pub fn without_api_key() -> Self {
        Self {
            api_key: None,
            ..Default::default()
        }
    }
}
