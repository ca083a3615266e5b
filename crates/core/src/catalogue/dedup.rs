//! Deduplication of catalogue rows by spine number.

use std::collections::HashSet;

use tracing::debug;

use super::CatalogueRow;

/// Deduplicate rows by spine number.
///
/// The first occurrence of each spine number wins; later rows with the same
/// number are dropped. Input order is otherwise preserved.
pub fn dedup_by_spine(rows: Vec<CatalogueRow>) -> Vec<CatalogueRow> {
    let total = rows.len();
    let mut seen: HashSet<u32> = HashSet::with_capacity(total);

    let unique: Vec<CatalogueRow> = rows
        .into_iter()
        .filter(|row| seen.insert(row.spine))
        .collect();

    if unique.len() < total {
        debug!(
            dropped = total - unique.len(),
            "Dropped duplicate catalogue rows"
        );
    }

    unique
}
