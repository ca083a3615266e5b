use reelfeed_core::{CollectionPager, Config, SanitizedConfig};
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    config: Config,
    pager: Arc<CollectionPager>,
}

impl AppState {
    pub fn new(config: Config, pager: Arc<CollectionPager>) -> Self {
        Self { config, pager }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn pager(&self) -> &CollectionPager {
        self.pager.as_ref()
    }
}
