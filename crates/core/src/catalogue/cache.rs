//! Write-once in-memory cache of the catalogue feed.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::collection::CollectionError;
use crate::metrics::FEED_LOADS;
use crate::parser::parse_records;
use crate::transport::HttpTransport;

use super::{dedup_by_spine, CatalogueRow};

/// Convert raw feed text into deduplicated catalogue rows.
///
/// Rows without a numeric spine number are skipped.
pub fn rows_from_feed(text: &str) -> Vec<CatalogueRow> {
    let records = parse_records(text);
    let total = records.len();

    let rows: Vec<CatalogueRow> = records
        .iter()
        .filter_map(CatalogueRow::from_record)
        .collect();

    if rows.len() < total {
        debug!(
            skipped = total - rows.len(),
            "Skipped feed records without a numeric spine number"
        );
    }

    dedup_by_spine(rows)
}

/// Catalogue cache, populated by the first successful [`FeedCache::ensure_loaded`].
///
/// The feed is fetched at most once per cache instance. Concurrent callers
/// during the first load wait for that load instead of issuing their own
/// request. A failed load leaves the cache empty so a later call can retry.
pub struct FeedCache {
    transport: Arc<dyn HttpTransport>,
    url: String,
    rows: OnceCell<Vec<CatalogueRow>>,
}

impl FeedCache {
    /// Create an empty cache that will load from `url`.
    pub fn new(transport: Arc<dyn HttpTransport>, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: url.into(),
            rows: OnceCell::new(),
        }
    }

    /// Feed URL this cache loads from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Load the feed if it has not been loaded yet and return the cached rows.
    pub async fn ensure_loaded(&self) -> Result<&[CatalogueRow], CollectionError> {
        self.rows
            .get_or_try_init(|| self.load())
            .await
            .map(Vec::as_slice)
    }

    /// Cached rows, if the feed has been loaded.
    pub fn rows(&self) -> Option<&[CatalogueRow]> {
        self.rows.get().map(Vec::as_slice)
    }

    pub fn is_loaded(&self) -> bool {
        self.rows.initialized()
    }

    /// Number of cached rows (zero until loaded).
    pub fn len(&self) -> usize {
        self.rows().map_or(0, <[CatalogueRow]>::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn load(&self) -> Result<Vec<CatalogueRow>, CollectionError> {
        info!(url = %self.url, "Fetching catalogue feed");

        let body = match self.transport.get_text(&self.url, &[]).await {
            Ok(body) => body,
            Err(e) => {
                warn!(url = %self.url, error = %e, "Catalogue feed fetch failed");
                FEED_LOADS.with_label_values(&["failed"]).inc();
                return Err(CollectionError::Fetch(format!("catalogue feed: {}", e)));
            }
        };

        if body.trim().is_empty() {
            warn!(url = %self.url, "Catalogue feed returned an empty body");
            FEED_LOADS.with_label_values(&["failed"]).inc();
            return Err(CollectionError::Fetch(
                "catalogue feed returned no data".to_string(),
            ));
        }

        let rows = rows_from_feed(&body);
        if rows.is_empty() {
            warn!(url = %self.url, bytes = body.len(), "Catalogue feed contained no catalogue rows");
            FEED_LOADS.with_label_values(&["failed"]).inc();
            return Err(CollectionError::Fetch(
                "catalogue feed contained no catalogue rows".to_string(),
            ));
        }

        FEED_LOADS.with_label_values(&["success"]).inc();
        info!(rows = rows.len(), "Cached catalogue feed");

        Ok(rows)
    }
}
