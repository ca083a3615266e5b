//! Catalogue row model.

use serde::{Deserialize, Serialize};

use crate::parser::Record;

/// Header names accepted for the spine (sequence) number column.
pub const SPINE_HEADERS: &[&str] = &["spine", "spine_number"];

/// One film in the curated catalogue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogueRow {
    /// Spine number: the collection's own sequence number, unique per film.
    pub spine: u32,
    /// Release year as written in the feed.
    pub year: String,
    pub country: String,
    pub title: String,
    pub director: String,
}

impl CatalogueRow {
    /// Build a row from a parsed feed record.
    ///
    /// Returns `None` when the spine number is missing or not numeric.
    pub fn from_record(record: &Record) -> Option<Self> {
        let spine = record.get_any(SPINE_HEADERS)?.parse::<u32>().ok()?;
        let field = |key: &str| record.get(key).unwrap_or_default().to_string();

        Some(Self {
            spine,
            year: field("year"),
            country: field("country"),
            title: field("title"),
            director: field("director"),
        })
    }

    /// The release year as a number, when the feed value is one.
    pub fn year_number(&self) -> Option<u32> {
        self.year.trim().parse().ok()
    }
}
