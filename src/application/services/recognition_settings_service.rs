use std::sync::Arc;
use tokio::sync::RwLock;

use crate::application::services::result_cache::ResultCache;
use crate::domain::value_objects::RecognitionConfig;

/// Holds the host's current recognition settings
pub struct RecognitionSettingsService {
    current: RwLock<RecognitionConfig>,
    cache: Option<Arc<ResultCache>>,
}

impl RecognitionSettingsService {
    pub fn new(initial: RecognitionConfig) -> Self {
        Self {
            current: RwLock::new(initial),
            cache: None,
        }
    }

    /// Cache to invalidate whenever the settings change
    pub fn with_cache(mut self, cache: Arc<ResultCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Get current settings
    pub async fn get(&self) -> RecognitionConfig {
        self.current.read().await.clone()
    }

    /// Replace settings and invalidate cached results
    pub async fn update(&self, settings: RecognitionConfig) -> RecognitionConfig {
        *self.current.write().await = settings.clone();
        tracing::info!(
            method = %settings.method,
            precision = settings.text_match_precision.as_str(),
            "Recognition settings updated"
        );
        self.invalidate().await;
        settings
    }

    /// Reset to env/defaults
    pub async fn reset(&self) -> RecognitionConfig {
        self.update(RecognitionConfig::from_env()).await
    }

    async fn invalidate(&self) {
        if let Some(cache) = &self.cache {
            cache.clear().await;
        }
    }
}
