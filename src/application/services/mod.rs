//! Application services - Use case implementations
//!
//! The router drives the pure domain services and the two external calls;
//! the rest supports it with caching, settings and narration.

pub mod ai_handoff_service;
pub mod configuration_recommender;
pub mod llm;
pub mod narration_templates;
pub mod recognition_settings_service;
pub mod result_cache;
pub mod scenario_router;

pub use ai_handoff_service::{
    AiHandoffService, AssistantAssessment, BackendHealth, BackendStatus, BasicCalculation,
    ExternalCallError, ExternalService, Narration, RecommendedProcessing, RetryPolicy,
};
pub use configuration_recommender::{ConfigurationRecommender, GameComplexity, RecommendationNeeds};
pub use narration_templates::NarrationTemplates;
pub use recognition_settings_service::RecognitionSettingsService;
pub use result_cache::{CachePolicy, CacheStats, ResultCache};
pub use scenario_router::{merge_hybrid, situational_factors, RouteDecision, ScenarioRouter};
