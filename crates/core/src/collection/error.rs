use thiserror::Error;

/// Errors that abort a page request.
///
/// Per-row lookup failures never show up here; they are absorbed by the
/// enrichment stage and the affected rows simply come back unmatched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CollectionError {
    /// Required configuration (such as the metadata API key) is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The catalogue feed or service configuration could not be fetched.
    #[error("Fetch failed: {0}")]
    Fetch(String),
}
