//! Shared application state

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::application::services::{
    AiHandoffService, RecognitionSettingsService, ResultCache, ScenarioRouter,
};
use crate::domain::rules::{BuiltinRuleSet, JsonRuleSetLoader, RuleSetLoader};
use crate::domain::services::{CalculationEngine, ScenarioClassifier};
use crate::domain::value_objects::RecognitionConfig;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::ollama::OllamaClient;

pub type EngineRouter = ScenarioRouter<OllamaClient, OllamaClient>;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub classifier: Arc<ScenarioClassifier>,
    pub engine: CalculationEngine,
    pub cache: Arc<ResultCache>,
    pub router: EngineRouter,
    pub settings_service: RecognitionSettingsService,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        // Pattern rules: a JSON file when configured, otherwise the built-in table
        let loader: Box<dyn RuleSetLoader> = match &config.rules_path {
            Some(path) => Box::new(JsonRuleSetLoader::new(path)),
            None => Box::new(BuiltinRuleSet),
        };
        let classifier = Arc::new(
            ScenarioClassifier::from_loader(&*loader)
                .context("Failed to load pattern rules")?,
        );
        tracing::info!(rules = classifier.rules().len(), "Pattern rules loaded");

        // External collaborators are optional; a disabled one behaves as unavailable
        let assistant = config
            .assistant_enabled
            .then(|| Arc::new(OllamaClient::new(&config.llm_base_url, &config.assistant_model)));
        let narrator = config
            .narrator_enabled
            .then(|| Arc::new(OllamaClient::new(&config.llm_base_url, &config.narrator_model)));
        let handoff = AiHandoffService::new(assistant, narrator)
            .with_assistant_policy(config.assistant_policy())
            .with_narrator_policy(config.narrator_policy());

        let engine = CalculationEngine::new();
        let cache = Arc::new(ResultCache::new(config.cache_policy()));
        let router = ScenarioRouter::new(classifier.clone(), engine, Arc::new(handoff))
            .with_cache(cache.clone())
            .with_rng_seed(config.rng_seed);

        let settings_service =
            RecognitionSettingsService::new(RecognitionConfig::from_env()).with_cache(cache.clone());

        Ok(Self {
            config,
            classifier,
            engine,
            cache,
            router,
            settings_service,
        })
    }
}
