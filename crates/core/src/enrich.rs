//! Concurrent per-row metadata lookups.

use std::time::Instant;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::catalogue::CatalogueRow;
use crate::metadata::{MetadataMatch, MetadataService};
use crate::metrics::{ENRICHMENT_DURATION, METADATA_LOOKUPS};

/// A catalogue row paired with its best metadata match, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRow {
    pub row: CatalogueRow,
    pub matched: Option<MetadataMatch>,
}

/// Look up every row concurrently and pair each with its best match.
///
/// All lookups are started together and the call returns once every one has
/// settled. A failed lookup is logged and treated exactly like "no match", so
/// one bad row never fails the batch. Output order matches `rows`.
pub async fn enrich_rows(service: &dyn MetadataService, rows: &[CatalogueRow]) -> Vec<EnrichedRow> {
    let start = Instant::now();

    let lookups = rows.iter().map(|row| async move {
        EnrichedRow {
            row: row.clone(),
            matched: lookup(service, row).await,
        }
    });
    let enriched = join_all(lookups).await;

    let elapsed = start.elapsed().as_secs_f64();
    ENRICHMENT_DURATION.observe(elapsed);
    debug!(
        rows = rows.len(),
        matched = enriched.iter().filter(|e| e.matched.is_some()).count(),
        elapsed_ms = (elapsed * 1000.0) as u64,
        "Enrichment complete"
    );

    enriched
}

async fn lookup(service: &dyn MetadataService, row: &CatalogueRow) -> Option<MetadataMatch> {
    match service.search_movies(&row.title, row.year_number()).await {
        Ok(results) => match results.into_iter().next() {
            Some(best) => {
                METADATA_LOOKUPS.with_label_values(&["matched"]).inc();
                Some(best)
            }
            None => {
                METADATA_LOOKUPS.with_label_values(&["no_match"]).inc();
                debug!(spine = row.spine, title = %row.title, "No metadata match");
                None
            }
        },
        Err(e) => {
            METADATA_LOOKUPS.with_label_values(&["failed"]).inc();
            warn!(
                spine = row.spine,
                title = %row.title,
                service = service.name(),
                error = %e,
                "Metadata lookup failed"
            );
            None
        }
    }
}
