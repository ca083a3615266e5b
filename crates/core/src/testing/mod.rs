//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the transport and metadata
//! service traits, allowing the full pipeline to run without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use reelfeed_core::testing::{fixtures, MockMetadataService, MockTransport};
//!
//! let transport = MockTransport::new();
//! transport.set_response("https://feed.test/criterion.csv", &fixtures::catalogue_csv(&rows)).await;
//!
//! let metadata = MockMetadataService::new();
//! metadata.add_movie(fixtures::metadata_match(346, "Seven Samurai", 1954)).await;
//! ```

mod mock_metadata;
mod mock_transport;

pub use mock_metadata::{MockMetadataService, RecordedSearch};
pub use mock_transport::{MockTransport, RecordedRequest};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalogue::CatalogueRow;
    use crate::metadata::{MetadataMatch, ServiceConfig};

    /// Create a catalogue row with reasonable defaults.
    pub fn catalogue_row(spine: u32, title: &str, year: &str) -> CatalogueRow {
        CatalogueRow {
            spine,
            year: year.to_string(),
            country: "Japan".to_string(),
            title: title.to_string(),
            director: format!("Director of {}", title),
        }
    }

    /// Create a metadata match with poster, backdrop, overview and rating.
    pub fn metadata_match(id: u64, title: &str, year: u32) -> MetadataMatch {
        MetadataMatch {
            id,
            title: title.to_string(),
            overview: Some(format!("A film about {}.", title.to_lowercase())),
            release_date: Some(format!("{}-06-15", year)),
            poster_path: Some("/poster.jpg".to_string()),
            backdrop_path: Some("/backdrop.jpg".to_string()),
            vote_average: Some(7.5),
        }
    }

    /// TMDB-like service configuration.
    pub fn service_config() -> ServiceConfig {
        let sizes = |tokens: &[&str]| tokens.iter().map(|t| t.to_string()).collect();
        ServiceConfig {
            image_base_url: "https://image.tmdb.org/t/p/".to_string(),
            poster_sizes: sizes(&["w92", "w154", "w185", "w342", "w500", "w780", "original"]),
            backdrop_sizes: sizes(&["w300", "w780", "w1280", "original"]),
        }
    }

    /// Render rows as a CSV feed with a header row and quoted fields.
    pub fn catalogue_csv(rows: &[CatalogueRow]) -> String {
        let quote = |s: &str| format!("\"{}\"", s.replace('"', "\"\""));
        let mut csv = String::from("spine,title,director,country,year\r\n");
        for row in rows {
            csv.push_str(&format!(
                "{},{},{},{},{}\r\n",
                row.spine,
                quote(&row.title),
                quote(&row.director),
                quote(&row.country),
                quote(&row.year)
            ));
        }
        csv
    }
}
