//! Prometheus metrics for the ingestion pipeline.
//!
//! This module provides metrics for:
//! - Catalogue feed loads
//! - Metadata lookups during enrichment
//! - Page requests and emitted records

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounterVec, Opts};

// =============================================================================
// Cache Metrics
// =============================================================================

/// Catalogue feed loads by result.
pub static FEED_LOADS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("reelfeed_feed_loads_total", "Total catalogue feed loads"),
        &["result"], // "success", "failed"
    )
    .unwrap()
});

// =============================================================================
// Enrichment Metrics
// =============================================================================

/// Metadata lookups by result.
pub static METADATA_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "reelfeed_metadata_lookups_total",
            "Total metadata service lookups",
        ),
        &["result"], // "matched", "no_match", "failed"
    )
    .unwrap()
});

/// Wall-clock time of one page's enrichment fan-out.
pub static ENRICHMENT_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "reelfeed_enrichment_duration_seconds",
            "Duration of the per-page metadata fan-out",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
    )
    .unwrap()
});

// =============================================================================
// Page Metrics
// =============================================================================

/// Page requests by result.
pub static PAGE_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("reelfeed_page_requests_total", "Total page requests"),
        &["result"], // "success", "configuration_error", "fetch_error"
    )
    .unwrap()
});

/// Output records emitted by kind.
pub static RECORDS_EMITTED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("reelfeed_records_emitted_total", "Total output records emitted"),
        &["kind"], // "tmdb", "catalogue"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(FEED_LOADS.clone()),
        Box::new(METADATA_LOOKUPS.clone()),
        Box::new(ENRICHMENT_DURATION.clone()),
        Box::new(PAGE_REQUESTS.clone()),
        Box::new(RECORDS_EMITTED.clone()),
    ]
}
