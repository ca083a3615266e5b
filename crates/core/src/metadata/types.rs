//! Types for metadata service responses.

use serde::{Deserialize, Serialize};

/// Best candidate returned by the metadata service for a catalogue row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetadataMatch {
    /// Service-side movie ID.
    pub id: u64,
    /// Title as known to the service (may be localized).
    pub title: String,
    /// Movie overview/synopsis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    /// Release date (YYYY-MM-DD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// Poster path (relative to the image base URL and size).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    /// Backdrop path (relative to the image base URL and size).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
    /// Average vote (0-10).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
}

impl MetadataMatch {
    /// Get the release year from the release date.
    pub fn year(&self) -> Option<u32> {
        self.release_date
            .as_ref()
            .and_then(|d| d.split('-').next())
            .and_then(|y| y.parse().ok())
    }
}

/// Service configuration needed to build image URLs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Base URL images are served from, e.g. `https://image.tmdb.org/t/p/`.
    pub image_base_url: String,
    /// Size tokens available for posters (`w92` ... `original`).
    #[serde(default)]
    pub poster_sizes: Vec<String>,
    /// Size tokens available for backdrops.
    #[serde(default)]
    pub backdrop_sizes: Vec<String>,
}

impl ServiceConfig {
    /// Build an image URL as `base + size + path`.
    pub fn image_url(&self, size: &str, path: &str) -> String {
        format!("{}{}{}", self.image_base_url, size, path)
    }
}

/// Pick `preferred` if the service offers it, otherwise the largest offered size.
///
/// An empty `available` list means the service did not advertise sizes, in
/// which case `preferred` is used as-is.
pub fn pick_size<'a>(preferred: &'a str, available: &'a [String]) -> &'a str {
    if available.is_empty() || available.iter().any(|s| s == preferred) {
        return preferred;
    }
    available.last().map(String::as_str).unwrap_or(preferred)
}
