//! Page orchestration: cache population, slicing, enrichment, normalization.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalogue::FeedCache;
use crate::config::{CollectionConfig, Config};
use crate::enrich::enrich_rows;
use crate::metadata::{MetadataService, ServiceConfigCache, TmdbClient};
use crate::metrics::PAGE_REQUESTS;
use crate::normalize::{normalize, DescriptionLabels, NormalizeOptions, OutputRecord};
use crate::transport::HttpTransport;

use super::CollectionError;

/// A page request as sent by the host.
///
/// Both fields are optional; see [`PageRequest::bounds`] for defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number.
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default, alias = "pageSize")]
    pub page_size: Option<i64>,
}

/// Resolved, zero-based slice bounds for a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    pub page: usize,
    pub page_size: usize,
    /// Inclusive start index.
    pub start: usize,
    /// Exclusive end index (not clamped to the catalogue length).
    pub end: usize,
}

impl PageRequest {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
        }
    }

    /// Resolve the request against the configured defaults.
    ///
    /// A missing or non-positive page becomes 1. A missing page size uses the
    /// configured default. Sizes below 1 become 1, and sizes are only capped
    /// when `max_page_size` is configured.
    pub fn bounds(&self, config: &CollectionConfig) -> PageBounds {
        let page = self
            .page
            .filter(|p| *p > 0)
            .map_or(1, |p| usize::try_from(p).unwrap_or(usize::MAX));

        let mut page_size = self
            .page_size
            .map_or(config.default_page_size, |s| {
                usize::try_from(s.max(1)).unwrap_or(usize::MAX)
            })
            .max(1);
        if let Some(max) = config.max_page_size {
            page_size = page_size.min(max.max(1));
        }

        let start = (page - 1).saturating_mul(page_size);
        PageBounds {
            page,
            page_size,
            start,
            end: start.saturating_add(page_size),
        }
    }
}

impl PageBounds {
    /// The part of `items` covered by these bounds; empty when out of range.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.start.min(items.len());
        let end = self.end.min(items.len());
        &items[start..end]
    }
}

/// Public entry point serving enriched catalogue pages.
///
/// Owns both write-once caches, so one pager per process gives
/// load-once behaviour and a fresh pager gives a clean slate.
pub struct CollectionPager {
    feed: FeedCache,
    service_config: ServiceConfigCache,
    metadata: Arc<dyn MetadataService>,
    config: CollectionConfig,
    normalize: NormalizeOptions,
}

impl CollectionPager {
    pub fn new(
        feed: FeedCache,
        metadata: Arc<dyn MetadataService>,
        config: CollectionConfig,
    ) -> Self {
        let normalize = NormalizeOptions::from(&config);
        Self {
            feed,
            service_config: ServiceConfigCache::new(),
            metadata,
            config,
            normalize,
        }
    }

    /// Build a pager from application configuration, with TMDB as the
    /// metadata service.
    pub fn from_config(config: &Config, transport: Arc<dyn HttpTransport>) -> Self {
        let feed = FeedCache::new(Arc::clone(&transport), config.feed.url.clone());
        let metadata = Arc::new(TmdbClient::new(config.tmdb.clone(), transport));
        Self::new(feed, metadata, config.collection.clone())
            .with_description_language(config.tmdb.language.as_deref())
    }

    /// Write record descriptions in the labels of a metadata language tag.
    pub fn with_description_language(mut self, language: Option<&str>) -> Self {
        self.normalize.labels = DescriptionLabels::for_language(language);
        self
    }

    /// Use an existing service configuration cache.
    pub fn with_service_config_cache(mut self, cache: ServiceConfigCache) -> Self {
        self.service_config = cache;
        self
    }

    pub fn feed(&self) -> &FeedCache {
        &self.feed
    }

    pub fn service_config(&self) -> &ServiceConfigCache {
        &self.service_config
    }

    pub fn collection_config(&self) -> &CollectionConfig {
        &self.config
    }

    /// Serve one page of enriched records.
    ///
    /// Fails only if the catalogue feed or service configuration cannot be
    /// loaded; individual lookup failures just leave rows unmatched.
    pub async fn get_page(&self, request: PageRequest) -> Result<Vec<OutputRecord>, CollectionError> {
        let result = self.load_page(request).await;

        let label = match &result {
            Ok(_) => "success",
            Err(CollectionError::Configuration(_)) => "configuration_error",
            Err(CollectionError::Fetch(_)) => "fetch_error",
        };
        PAGE_REQUESTS.with_label_values(&[label]).inc();

        result
    }

    async fn load_page(&self, request: PageRequest) -> Result<Vec<OutputRecord>, CollectionError> {
        let rows = self.feed.ensure_loaded().await?;
        let service_config = self
            .service_config
            .ensure_loaded(self.metadata.as_ref())
            .await?;

        let bounds = request.bounds(&self.config);
        let page_rows = bounds.slice(rows);
        debug!(
            page = bounds.page,
            page_size = bounds.page_size,
            rows = page_rows.len(),
            total = rows.len(),
            "Serving catalogue page"
        );

        let enriched = enrich_rows(self.metadata.as_ref(), page_rows).await;
        Ok(normalize(enriched, service_config, &self.normalize))
    }
}
