//! Application configuration

use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::application::services::{CachePolicy, RetryPolicy};

/// Application configuration
///
/// Loaded from built-in defaults, then an optional `scenario-engine` file,
/// then `ENGINE_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP server port
    pub server_port: u16,

    /// OpenAI-compatible API base URL (Ollama by default)
    pub llm_base_url: String,
    /// Model used for the structured classification call
    pub assistant_model: String,
    /// Model used for narration
    pub narrator_model: String,
    pub assistant_enabled: bool,
    pub narrator_enabled: bool,

    pub assistant_timeout_ms: u64,
    pub narrator_timeout_ms: u64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,

    pub cache_max_entries: usize,
    pub cache_ttl_secs: u64,
    /// Shorter lifetime for results produced while a backend was down
    pub cache_degraded_ttl_secs: u64,

    /// Fixed RNG seed for reproducible calculations
    #[serde(default)]
    pub rng_seed: Option<u64>,
    /// JSON rule file replacing the built-in rules
    #[serde(default)]
    pub rules_path: Option<String>,
}

impl AppConfig {
    /// Load configuration from defaults, the optional config file and the environment
    pub fn load() -> Result<Self> {
        Self::build(Some("scenario-engine"))
    }

    fn build(file: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("server_port", 3000)?
            .set_default("llm_base_url", "http://localhost:11434/v1")?
            .set_default("assistant_model", "qwen2.5:7b")?
            .set_default("narrator_model", "qwen2.5:14b")?
            .set_default("assistant_enabled", true)?
            .set_default("narrator_enabled", true)?
            .set_default("assistant_timeout_ms", 15_000)?
            .set_default("narrator_timeout_ms", 60_000)?
            .set_default("max_retries", 2)?
            .set_default("retry_base_delay_ms", 500)?
            .set_default("cache_max_entries", 1024)?
            .set_default("cache_ttl_secs", 1800)?
            .set_default("cache_degraded_ttl_secs", 60)?;

        if let Some(file) = file {
            builder = builder.add_source(File::with_name(file).required(false));
        }

        builder
            .add_source(Environment::with_prefix("ENGINE").try_parsing(true))
            .build()
            .context("Failed to assemble configuration sources")?
            .try_deserialize()
            .context("Invalid engine configuration")
    }

    pub fn assistant_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_delay: Duration::from_millis(self.retry_base_delay_ms),
            timeout: Duration::from_millis(self.assistant_timeout_ms),
        }
    }

    pub fn narrator_policy(&self) -> RetryPolicy {
        RetryPolicy {
            timeout: Duration::from_millis(self.narrator_timeout_ms),
            ..self.assistant_policy()
        }
    }

    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy {
            max_entries: self.cache_max_entries,
            ttl: Duration::from_secs(self.cache_ttl_secs),
            degraded_ttl: Duration::from_secs(self.cache_degraded_ttl_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = AppConfig::build(None).unwrap();
        assert!(config.llm_base_url.starts_with("http"));
        assert!(config.cache_max_entries > 0);

        let narrator = config.narrator_policy();
        assert_eq!(narrator.max_retries, config.max_retries);
        assert_eq!(narrator.timeout, Duration::from_millis(config.narrator_timeout_ms));
        let cache = config.cache_policy();
        assert_eq!(cache.ttl, Duration::from_secs(config.cache_ttl_secs));
        assert!(cache.degraded_ttl < cache.ttl);
    }
}
