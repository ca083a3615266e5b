use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Feed URL is not empty
/// - Page sizes are positive and consistent
///
/// A missing TMDB API key is not rejected here; page requests report it.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.feed.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "feed.url cannot be empty".to_string(),
        ));
    }

    if config.collection.default_page_size == 0 {
        return Err(ConfigError::ValidationError(
            "collection.default_page_size must be at least 1".to_string(),
        ));
    }

    if let Some(max) = config.collection.max_page_size {
        if max < config.collection.default_page_size {
            return Err(ConfigError::ValidationError(format!(
                "collection.max_page_size ({}) is smaller than collection.default_page_size ({})",
                max, config.collection.default_page_size
            )));
        }
    }

    Ok(())
}
