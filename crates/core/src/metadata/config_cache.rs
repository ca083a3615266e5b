//! Write-once cache of the metadata service configuration.

use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::collection::CollectionError;

use super::{MetadataError, MetadataService, ServiceConfig};

/// Credential values shipped in sample configs that must never reach the service.
pub const PLACEHOLDER_CREDENTIALS: &[&str] = &[
    "xxx",
    "your_api_key_here",
    "your-api-key",
    "changeme",
    "<api_key>",
];

/// Check that a credential is present and not a known placeholder.
pub fn check_credential(credential: Option<&str>) -> Result<&str, CollectionError> {
    let credential = credential.map(str::trim).unwrap_or_default();

    if credential.is_empty() {
        return Err(CollectionError::Configuration(
            "metadata service API key is not configured".to_string(),
        ));
    }

    if PLACEHOLDER_CREDENTIALS
        .iter()
        .any(|p| p.eq_ignore_ascii_case(credential))
    {
        return Err(CollectionError::Configuration(
            "metadata service API key is a placeholder value".to_string(),
        ));
    }

    Ok(credential)
}

/// Service configuration cache, populated by the first successful
/// [`ServiceConfigCache::ensure_loaded`].
#[derive(Debug, Default)]
pub struct ServiceConfigCache {
    config: OnceCell<ServiceConfig>,
}

impl ServiceConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache that is already populated.
    pub fn with_config(config: ServiceConfig) -> Self {
        Self {
            config: OnceCell::new_with(Some(config)),
        }
    }

    /// Fetch the service configuration if not cached yet and return it.
    ///
    /// The service credential is checked before any request is made. A
    /// missing or placeholder credential is a configuration error.
    pub async fn ensure_loaded(
        &self,
        service: &dyn MetadataService,
    ) -> Result<&ServiceConfig, CollectionError> {
        if let Some(config) = self.config.get() {
            return Ok(config);
        }

        check_credential(service.credential())?;

        self.config
            .get_or_try_init(|| async {
                info!(service = service.name(), "Fetching metadata service configuration");

                let config = service.configuration().await.map_err(|e| {
                    warn!(service = service.name(), error = %e, "Metadata configuration fetch failed");
                    match e {
                        MetadataError::NotConfigured(msg) => CollectionError::Configuration(msg),
                        other => CollectionError::Fetch(format!(
                            "metadata service configuration: {}",
                            other
                        )),
                    }
                })?;

                info!(
                    image_base_url = %config.image_base_url,
                    "Cached metadata service configuration"
                );
                Ok::<_, CollectionError>(config)
            })
            .await
    }

    /// Cached configuration, if loaded.
    pub fn get(&self) -> Option<&ServiceConfig> {
        self.config.get()
    }

    pub fn is_loaded(&self) -> bool {
        self.config.initialized()
    }
}
