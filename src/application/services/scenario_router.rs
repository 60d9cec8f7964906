//! Scenario Router - picks the classification strategy for one player action
//!
//! Runs the classifier and/or the assistant according to the configured
//! `RecognitionMethod`, merges their outputs by confidence, invokes the
//! calculation engine when the chosen scenario is calculable, and narrates
//! the outcome either locally or through the narrator.
//!
//! External failures never escape: they switch the call onto its fallback
//! branch and mark the result as degraded.

use std::sync::Arc;
use std::time::Instant;

use futures_util::future::join;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::Instrument;
use uuid::Uuid;

use crate::application::ports::inbound::ResolveActionUseCase;
use crate::application::ports::outbound::LlmPort;
use crate::application::services::ai_handoff_service::{AiHandoffService, AssistantAssessment};
use crate::application::services::llm::NarrationRequest;
use crate::application::services::narration_templates::{NarrationTemplates, ALTERNATIVES_BELOW};
use crate::application::services::result_cache::ResultCache;
use crate::domain::entities::{PlayerSnapshot, SituationalContext};
use crate::domain::services::{CalculationEngine, CalculationError, ScenarioClassifier};
use crate::domain::value_objects::{
    CalculationResult, ClassificationResult, FactorType, Importance, InfluenceFactor,
    ProcessingMethod, ProcessingResult, RealmStage, RecognitionConfig, RecognitionMethod,
    ScenarioType,
};

/// Classifier confidence accepted without asking the assistant in `text_primary`
pub const TEXT_ACCEPT_THRESHOLD: f64 = 0.6;
/// Assistant confidence accepted in `ai_primary`
pub const AI_ACCEPT_THRESHOLD: f64 = 0.6;
/// Confidence at which one side dominates in `hybrid`
pub const HYBRID_DOMINANCE_THRESHOLD: f64 = 0.7;
/// Confidence reported when neither side produced anything
pub const FALLBACK_CONFIDENCE: f64 = 0.3;
/// Cost per token of narrator output
pub const COST_PER_TOKEN: f64 = 0.001;
const CHARS_PER_TOKEN: f64 = 3.0;

const WEAPON_TAGS: [&str; 5] = ["剑", "刀", "sword", "blade", "weapon"];
const FURNACE_TAGS: [&str; 2] = ["丹炉", "furnace"];
const FORGE_TAGS: [&str; 4] = ["炉火", "锤", "forge", "hammer"];
const SPIRIT_LOCATION_TAGS: [&str; 5] = ["灵泉", "洞天", "洞府", "spirit spring", "cave abode"];

/// Which side supplied the chosen scenario
#[derive(Debug, Clone, PartialEq)]
enum Source {
    Text(ClassificationResult),
    Ai(AssistantAssessment),
    Default,
}

/// Outcome of the routing step, before calculation and narration
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDecision {
    pub scenario: ScenarioType,
    pub confidence: f64,
    pub method: ProcessingMethod,
    pub reasoning: Vec<String>,
    pub assessment: Option<AssistantAssessment>,
    /// Whether the narrator should write up this outcome
    pub narrate_externally: bool,
    pub degraded: bool,
}

impl RouteDecision {
    fn new(source: Source, method: ProcessingMethod, narrate_externally: bool) -> Self {
        let (scenario, confidence, reasoning, assessment) = match source {
            Source::Text(result) => (
                result.scenario_type,
                result.confidence,
                result.reasoning,
                None,
            ),
            Source::Ai(assessment) => {
                let mut reasoning = vec![format!(
                    "assistant classified as {} ({:.2})",
                    assessment.scenario, assessment.confidence
                )];
                if !assessment.reasoning.is_empty() {
                    reasoning.push(assessment.reasoning.clone());
                }
                (
                    assessment.scenario,
                    assessment.confidence,
                    reasoning,
                    Some(assessment),
                )
            }
            Source::Default => (
                ScenarioType::Exploration,
                FALLBACK_CONFIDENCE,
                vec!["no classification available, defaulting to exploration".to_string()],
                None,
            ),
        };

        Self {
            scenario,
            confidence,
            method,
            reasoning,
            assessment,
            narrate_externally,
            degraded: false,
        }
    }

    fn degraded(mut self, degraded: bool) -> Self {
        self.degraded = degraded;
        self
    }
}

/// Merge concurrent classifier and assistant outputs
///
/// A classifier result at or above the dominance threshold wins outright,
/// then an assistant result at or above it; otherwise the higher confidence
/// wins with ties going to the classifier.
pub fn merge_hybrid(
    text: Option<ClassificationResult>,
    ai: Option<AssistantAssessment>,
) -> RouteDecision {
    match (text, ai) {
        (Some(text), _) if text.confidence >= HYBRID_DOMINANCE_THRESHOLD => {
            RouteDecision::new(Source::Text(text), ProcessingMethod::HybridTextDominant, true)
        }
        (_, Some(ai)) if ai.confidence >= HYBRID_DOMINANCE_THRESHOLD => {
            RouteDecision::new(Source::Ai(ai), ProcessingMethod::HybridAiDominant, true)
        }
        (Some(text), Some(ai)) => {
            if ai.confidence > text.confidence {
                RouteDecision::new(Source::Ai(ai), ProcessingMethod::HybridAiPreferred, true)
            } else {
                RouteDecision::new(Source::Text(text), ProcessingMethod::HybridTextPreferred, true)
            }
        }
        (Some(text), None) => {
            RouteDecision::new(Source::Text(text), ProcessingMethod::HybridTextOnly, true)
        }
        (None, Some(ai)) => {
            RouteDecision::new(Source::Ai(ai), ProcessingMethod::HybridAiPreferred, true)
        }
        (None, None) => RouteDecision::new(Source::Default, ProcessingMethod::HybridFallback, true),
    }
}

/// Influence factors implied by the surroundings
pub fn situational_factors(
    scenario: ScenarioType,
    context: &SituationalContext,
) -> Vec<InfluenceFactor> {
    let mut factors = Vec::new();
    let has_any = |tags: &[&str]| tags.iter().any(|tag| context.has_object(tag));

    if has_any(&WEAPON_TAGS) {
        factors.push(
            InfluenceFactor::new(
                FactorType::Equipment,
                "Weapon at hand",
                "a weapon within reach steadies your hand",
                Importance::Major,
            )
            .with_numeric_value(10.0),
        );
    }

    if scenario == ScenarioType::Alchemy && has_any(&FURNACE_TAGS) {
        factors.push(
            InfluenceFactor::new(
                FactorType::Equipment,
                "Alchemy furnace",
                "a proper furnace keeps the flame even",
                Importance::Major,
            )
            .with_numeric_value(10.0),
        );
    }

    if scenario == ScenarioType::Crafting && has_any(&FORGE_TAGS) {
        factors.push(
            InfluenceFactor::new(
                FactorType::Equipment,
                "Forge tools",
                "the forge and hammer answer your intent",
                Importance::Major,
            )
            .with_numeric_value(8.0),
        );
    }

    if matches!(scenario, ScenarioType::Breakthrough | ScenarioType::Cultivation)
        && SPIRIT_LOCATION_TAGS
            .iter()
            .any(|tag| context.location_contains(tag))
    {
        factors.push(
            InfluenceFactor::new(
                FactorType::Environment,
                "Spirit-rich ground",
                "dense spiritual qi saturates the air around you",
                Importance::Major,
            )
            .with_numeric_value(10.0),
        );
    }

    factors
}

/// Strategy router over the classifier, engine, assistant and narrator
pub struct ScenarioRouter<A: LlmPort, N: LlmPort> {
    classifier: Arc<ScenarioClassifier>,
    engine: CalculationEngine,
    handoff: Arc<AiHandoffService<A, N>>,
    cache: Option<Arc<ResultCache>>,
    rng_seed: Option<u64>,
}

impl<A: LlmPort, N: LlmPort> ScenarioRouter<A, N> {
    pub fn new(
        classifier: Arc<ScenarioClassifier>,
        engine: CalculationEngine,
        handoff: Arc<AiHandoffService<A, N>>,
    ) -> Self {
        Self {
            classifier,
            engine,
            handoff,
            cache: None,
            rng_seed: None,
        }
    }

    pub fn with_cache(mut self, cache: Arc<ResultCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Fix the per-call RNG seed; every call then draws the same sequence
    pub fn with_rng_seed(mut self, seed: Option<u64>) -> Self {
        self.rng_seed = seed;
        self
    }

    pub fn handoff(&self) -> &AiHandoffService<A, N> {
        &self.handoff
    }

    /// Resolve one player action into a `ProcessingResult`
    ///
    /// Only an out-of-range player snapshot produces an error; external
    /// failures are absorbed into degraded results.
    pub async fn process(
        &self,
        input: &str,
        context: &SituationalContext,
        player: Option<&PlayerSnapshot>,
        config: &RecognitionConfig,
    ) -> Result<ProcessingResult, CalculationError> {
        let span = tracing::info_span!(
            "resolve_action",
            request_id = %Uuid::new_v4(),
            method = %config.method
        );
        self.process_inner(input, context, player, config)
            .instrument(span)
            .await
    }

    async fn process_inner(
        &self,
        input: &str,
        context: &SituationalContext,
        player: Option<&PlayerSnapshot>,
        config: &RecognitionConfig,
    ) -> Result<ProcessingResult, CalculationError> {
        let started = Instant::now();

        let cache_key = match (&self.cache, config.cache_results) {
            (Some(_), true) => Some(ResultCache::key(input, context, player, config)),
            _ => None,
        };
        if let (Some(cache), Some(key)) = (&self.cache, &cache_key) {
            if let Some(cached) = cache.get(key).await {
                tracing::info!(scenario = %cached.scenario, "Returning cached result");
                return Ok(cached);
            }
        }

        let decision = self.route(input, context, player, config).await;
        tracing::info!(
            scenario = %decision.scenario,
            confidence = decision.confidence,
            method = %decision.method,
            degraded = decision.degraded,
            "Routing decided"
        );

        let fallback_player;
        let player = match player {
            Some(player) => player,
            None => {
                fallback_player = PlayerSnapshot::new(0, RealmStage::Early);
                &fallback_player
            }
        };

        let mut factors = player.influence_factors.clone();
        factors.extend(situational_factors(decision.scenario, context));

        let calculation = if config.enable_programmatic_calculation
            && self.classifier.is_calculable(decision.scenario)
            && self.engine.supports(decision.scenario)
        {
            let mut rng = match self.rng_seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            Some(self.engine.calculate(
                decision.scenario,
                player,
                player.luck,
                &factors,
                &mut rng,
            )?)
        } else {
            None
        };

        let (final_content, cost_estimate, narration_degraded) = self
            .narrate(input, context, player, &decision, calculation.as_ref(), &factors)
            .await;

        let result = ProcessingResult {
            scenario: decision.scenario,
            confidence: decision.confidence,
            method: decision.method,
            calculation,
            final_content,
            processing_time_ms: started.elapsed().as_millis() as u64,
            cost_estimate,
            degraded: decision.degraded || narration_degraded,
            classification_reasoning: decision.reasoning,
            input: input.to_string(),
        };

        if let (Some(cache), Some(key)) = (&self.cache, cache_key) {
            cache.insert(key, result.clone()).await;
        }

        Ok(result)
    }

    /// Pick the scenario according to the configured method
    pub async fn route(
        &self,
        input: &str,
        context: &SituationalContext,
        player: Option<&PlayerSnapshot>,
        config: &RecognitionConfig,
    ) -> RouteDecision {
        let precision = config.text_match_precision;

        match config.method {
            RecognitionMethod::TextOnly => {
                let text = self.classifier.classify(input, Some(context), precision);
                RouteDecision::new(Source::Text(text), ProcessingMethod::TextOnly, false)
            }
            RecognitionMethod::TextPrimary => {
                let text = self.classifier.classify(input, Some(context), precision);
                if text.confidence >= TEXT_ACCEPT_THRESHOLD {
                    return RouteDecision::new(
                        Source::Text(text),
                        ProcessingMethod::TextPrimary,
                        false,
                    );
                }
                if !config.ai_backup_enabled {
                    tracing::debug!("Classifier below threshold and AI backup disabled");
                    return RouteDecision::new(
                        Source::Text(text),
                        ProcessingMethod::TextPrimaryFallback,
                        false,
                    );
                }
                match self.handoff.assess(input, context, player).await {
                    Ok(ai) => {
                        RouteDecision::new(Source::Ai(ai), ProcessingMethod::TextPrimaryAiBackup, true)
                    }
                    Err(e) => {
                        tracing::warn!("Assistant backup failed, keeping classifier result: {}", e);
                        RouteDecision::new(
                            Source::Text(text),
                            ProcessingMethod::TextPrimaryFallback,
                            false,
                        )
                        .degraded(true)
                    }
                }
            }
            RecognitionMethod::AiPrimary => match self.handoff.assess(input, context, player).await {
                Ok(ai) if ai.confidence >= AI_ACCEPT_THRESHOLD => {
                    RouteDecision::new(Source::Ai(ai), ProcessingMethod::AiPrimary, true)
                }
                outcome => {
                    let degraded = match &outcome {
                        Ok(ai) => {
                            tracing::debug!(
                                confidence = ai.confidence,
                                "Assistant below threshold, using classifier"
                            );
                            false
                        }
                        Err(e) => {
                            tracing::warn!("Assistant failed, using classifier: {}", e);
                            true
                        }
                    };
                    let text = self.classifier.classify(input, Some(context), precision);
                    RouteDecision::new(
                        Source::Text(text),
                        ProcessingMethod::AiPrimaryTextBackup,
                        false,
                    )
                    .degraded(degraded)
                }
            },
            RecognitionMethod::Hybrid => {
                let classify = async { self.classifier.classify(input, Some(context), precision) };
                let (text, ai) = join(classify, self.handoff.assess(input, context, player)).await;

                let degraded = ai.is_err();
                let ai = match ai {
                    Ok(ai) => Some(ai),
                    Err(e) => {
                        tracing::warn!("Assistant unavailable in hybrid mode: {}", e);
                        None
                    }
                };
                merge_hybrid(Some(text), ai).degraded(degraded)
            }
        }
    }

    /// Returns the content, its cost estimate and whether the narrator fell back
    async fn narrate(
        &self,
        input: &str,
        context: &SituationalContext,
        player: &PlayerSnapshot,
        decision: &RouteDecision,
        calculation: Option<&CalculationResult>,
        factors: &[InfluenceFactor],
    ) -> (String, f64, bool) {
        if !decision.narrate_externally {
            let alternatives = if decision.confidence < ALTERNATIVES_BELOW {
                self.classifier.suggest_alternatives(input, Some(context))
            } else {
                Vec::new()
            };
            let content = NarrationTemplates::render(
                input,
                decision.scenario,
                decision.confidence,
                calculation,
                &decision.reasoning,
                &alternatives,
            );
            return (content, 0.0, false);
        }

        let request = NarrationRequest {
            input,
            scenario: decision.scenario,
            assessment: decision.assessment.as_ref(),
            calculation,
            luck: Some(player.luck),
            factors,
            player: Some(player),
        };
        let narration = self.handoff.narrate_or_fallback(&request).await;
        let cost = match (narration.degraded, narration.completion_tokens) {
            (true, _) => 0.0,
            (false, Some(tokens)) => f64::from(tokens) * COST_PER_TOKEN,
            (false, None) => estimate_cost(&narration.content),
        };
        (narration.content, cost, narration.degraded)
    }
}

/// Rough token cost of generated text, for backends that report no usage
pub fn estimate_cost(content: &str) -> f64 {
    (content.chars().count() as f64 / CHARS_PER_TOKEN) * COST_PER_TOKEN
}

#[async_trait::async_trait]
impl<A: LlmPort, N: LlmPort> ResolveActionUseCase for ScenarioRouter<A, N> {
    async fn resolve_action(
        &self,
        input: &str,
        context: &SituationalContext,
        player: Option<&PlayerSnapshot>,
        config: &RecognitionConfig,
    ) -> Result<ProcessingResult, CalculationError> {
        self.process(input, context, player, config).await
    }
}
