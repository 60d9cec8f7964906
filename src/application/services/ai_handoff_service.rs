//! AI Hand-off Service - the assistant and narrator calls
//!
//! Two external calls, both optional:
//! 1. the assistant classifies the input and returns a structured assessment,
//!    validated here into `AssistantAssessment` (parse-or-reject);
//! 2. the narrator turns the resolved scenario and numbers into prose.
//!
//! Both go through `call_with_retry`: per-attempt timeout, bounded retries,
//! linear backoff. Failures never escape as panics; callers get a typed
//! `ExternalCallError` and decide how to degrade.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join;
use serde::{Deserialize, Serialize};
use tokio::time::{sleep, timeout};

use crate::application::ports::outbound::{FinishReason, LlmPort, LlmRequest, LlmResponse};
use crate::application::services::llm::{
    build_assistant_message, build_assistant_system_prompt, build_narrator_message,
    build_narrator_system_prompt, NarrationRequest,
};
use crate::application::services::narration_templates::NarrationTemplates;
use crate::domain::entities::{PlayerSnapshot, SituationalContext};
use crate::domain::value_objects::ScenarioType;

/// Which external collaborator a call went to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalService {
    Assistant,
    Narrator,
}

impl std::fmt::Display for ExternalService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Assistant => write!(f, "assistant"),
            Self::Narrator => write!(f, "narrator"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExternalCallError {
    #[error("The {0} service is not configured")]
    Unavailable(ExternalService),
    #[error("The {service} call timed out after {timeout_ms}ms")]
    Timeout {
        service: ExternalService,
        timeout_ms: u64,
    },
    #[error("The {service} backend failed: {message}")]
    Backend {
        service: ExternalService,
        message: String,
    },
    #[error("Malformed {service} reply: {reason}")]
    MalformedReply {
        service: ExternalService,
        reason: String,
    },
    #[error("The {0} returned an empty reply")]
    EmptyReply(ExternalService),
}

impl ExternalCallError {
    /// Transient failures worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Backend { .. } | Self::EmptyReply(_)
        )
    }
}

/// Timeout and retry budget for one external service
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Attempts after the first one
    pub max_retries: u32,
    /// Backoff before retry `n` is `base_delay * n`
    pub base_delay: Duration,
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(500),
            timeout: Duration::from_secs(15),
        }
    }
}

impl RetryPolicy {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// How the assistant suggests the outcome should be decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedProcessing {
    Programmatic,
    AiHeavy,
    Balanced,
}

impl RecommendedProcessing {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace('-', "_").as_str() {
            "programmatic" => Some(Self::Programmatic),
            "ai_heavy" => Some(Self::AiHeavy),
            "balanced" => Some(Self::Balanced),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Programmatic => "programmatic",
            Self::AiHeavy => "ai_heavy",
            Self::Balanced => "balanced",
        }
    }
}

/// Optional numeric estimate from the assistant, for reference only
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicCalculation {
    #[serde(default)]
    pub success_rate: Option<f64>,
    #[serde(default)]
    pub effect_value: Option<f64>,
    #[serde(default)]
    pub difficulty_assessment: Option<String>,
}

/// Validated assistant reply
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssistantAssessment {
    pub scenario: ScenarioType,
    pub confidence: f64,
    pub basic_calculation: Option<BasicCalculation>,
    pub factors_to_consider: Vec<String>,
    pub recommended_processing: RecommendedProcessing,
    pub reasoning: String,
}

/// Raw reply shape before validation
#[derive(Debug, Deserialize)]
struct AssessmentWire {
    scenario_type: String,
    confidence: f64,
    #[serde(default)]
    basic_calculation: Option<BasicCalculation>,
    #[serde(default)]
    factors_to_consider: Vec<String>,
    #[serde(default)]
    recommended_processing: Option<String>,
    #[serde(default)]
    reasoning: String,
}

impl AssistantAssessment {
    /// Parse and validate a raw assistant reply
    pub fn parse(raw: &str) -> Result<Self, ExternalCallError> {
        let malformed = |reason: String| ExternalCallError::MalformedReply {
            service: ExternalService::Assistant,
            reason,
        };

        let wire: AssessmentWire =
            serde_json::from_str(extract_json(raw)).map_err(|e| malformed(e.to_string()))?;

        let scenario = ScenarioType::parse_label(&wire.scenario_type)
            .ok_or_else(|| malformed(format!("unknown scenario label '{}'", wire.scenario_type)))?;

        if !(0.0..=1.0).contains(&wire.confidence) {
            return Err(malformed(format!(
                "confidence {} is outside [0, 1]",
                wire.confidence
            )));
        }

        let recommended_processing = match wire.recommended_processing.as_deref() {
            None => RecommendedProcessing::Balanced,
            Some(value) => RecommendedProcessing::parse(value)
                .ok_or_else(|| malformed(format!("unknown recommended_processing '{}'", value)))?,
        };

        Ok(Self {
            scenario,
            confidence: wire.confidence,
            basic_calculation: wire.basic_calculation,
            factors_to_consider: wire.factors_to_consider,
            recommended_processing,
            reasoning: wire.reasoning,
        })
    }
}

/// Locate the JSON payload: a fenced json block, else the outermost braces, else the raw text
fn extract_json(raw: &str) -> &str {
    if let Some(start) = raw.find("```json") {
        let body = &raw[start + "```json".len()..];
        if let Some(end) = body.find("```") {
            return body[..end].trim();
        }
    }
    if let Some(start) = raw.find('{') {
        if let Some(end) = raw.rfind('}') {
            if end > start {
                return &raw[start..=end];
            }
        }
    }
    raw.trim()
}

/// Narration outcome; `degraded` means the local fallback stood in
#[derive(Debug, Clone, PartialEq)]
pub struct Narration {
    pub content: String,
    pub degraded: bool,
    /// Tokens the narrator reported generating, when the backend says
    pub completion_tokens: Option<u32>,
}

/// Reachability of one external collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendHealth {
    Disabled,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BackendStatus {
    pub assistant: BackendHealth,
    pub narrator: BackendHealth,
}

/// Service driving the assistant and narrator backends
pub struct AiHandoffService<A: LlmPort, N: LlmPort> {
    assistant: Option<Arc<A>>,
    narrator: Option<Arc<N>>,
    assistant_policy: RetryPolicy,
    narrator_policy: RetryPolicy,
}

impl<A: LlmPort, N: LlmPort> AiHandoffService<A, N> {
    pub fn new(assistant: Option<Arc<A>>, narrator: Option<Arc<N>>) -> Self {
        Self {
            assistant,
            narrator,
            assistant_policy: RetryPolicy::default(),
            narrator_policy: RetryPolicy::default().with_timeout(Duration::from_secs(60)),
        }
    }

    pub fn with_assistant_policy(mut self, policy: RetryPolicy) -> Self {
        self.assistant_policy = policy;
        self
    }

    pub fn with_narrator_policy(mut self, policy: RetryPolicy) -> Self {
        self.narrator_policy = policy;
        self
    }

    /// Ask both backends whether they are reachable, bounded by each call timeout
    pub async fn backend_status(&self) -> BackendStatus {
        let (assistant, narrator) = join(
            check_health(
                ExternalService::Assistant,
                self.assistant.as_deref(),
                self.assistant_policy.timeout,
            ),
            check_health(
                ExternalService::Narrator,
                self.narrator.as_deref(),
                self.narrator_policy.timeout,
            ),
        )
        .await;
        BackendStatus { assistant, narrator }
    }

    /// Structured classification from the assistant
    pub async fn assess(
        &self,
        input: &str,
        context: &SituationalContext,
        player: Option<&PlayerSnapshot>,
    ) -> Result<AssistantAssessment, ExternalCallError> {
        let assistant = self
            .assistant
            .as_ref()
            .ok_or(ExternalCallError::Unavailable(ExternalService::Assistant))?;

        let request = LlmRequest::new(vec![build_assistant_message(input, context, player)])
            .with_system_prompt(build_assistant_system_prompt())
            .with_temperature(0.1)
            .with_max_tokens(Some(400))
            .with_json_mode();

        let assessment = call_with_retry(
            ExternalService::Assistant,
            &**assistant,
            request,
            &self.assistant_policy,
            |response| AssistantAssessment::parse(&response.content),
        )
        .await?;

        tracing::info!(
            scenario = %assessment.scenario,
            confidence = assessment.confidence,
            processing = assessment.recommended_processing.as_str(),
            "Assistant assessment received"
        );
        Ok(assessment)
    }

    /// Prose from the narrator
    pub async fn narrate(
        &self,
        request: &NarrationRequest<'_>,
    ) -> Result<Narration, ExternalCallError> {
        let narrator = self
            .narrator
            .as_ref()
            .ok_or(ExternalCallError::Unavailable(ExternalService::Narrator))?;

        let llm_request = LlmRequest::new(vec![build_narrator_message(request)])
            .with_system_prompt(build_narrator_system_prompt())
            .with_temperature(0.8)
            .with_max_tokens(Some(800));

        call_with_retry(
            ExternalService::Narrator,
            &**narrator,
            llm_request,
            &self.narrator_policy,
            |response| {
                if response.finish_reason == Some(FinishReason::Length) {
                    tracing::warn!("Narration was cut off at the token limit");
                }
                Ok(Narration {
                    content: response.content.trim().to_string(),
                    degraded: false,
                    completion_tokens: response.usage.map(|usage| usage.completion_tokens),
                })
            },
        )
        .await
    }

    /// Narrate, falling back to a local template when the narrator fails
    pub async fn narrate_or_fallback(&self, request: &NarrationRequest<'_>) -> Narration {
        match self.narrate(request).await {
            Ok(narration) => narration,
            Err(e) => {
                tracing::warn!("Narration failed, using local fallback: {}", e);
                Narration {
                    content: NarrationTemplates::fallback(
                        request.input,
                        request.scenario,
                        request.calculation,
                    ),
                    degraded: true,
                    completion_tokens: None,
                }
            }
        }
    }
}

async fn check_health<L>(service: ExternalService, llm: Option<&L>, limit: Duration) -> BackendHealth
where
    L: LlmPort + ?Sized,
{
    let Some(llm) = llm else {
        return BackendHealth::Disabled;
    };
    match timeout(limit, llm.health_check()).await {
        Ok(Ok(())) => BackendHealth::Up,
        Ok(Err(e)) => {
            tracing::warn!("{} health check failed: {}", service, e);
            BackendHealth::Down
        }
        Err(_) => {
            tracing::warn!("{} health check timed out", service);
            BackendHealth::Down
        }
    }
}

/// Run one external call with timeout, bounded retries and linear backoff
///
/// Malformed replies are returned immediately; retrying the same prompt is
/// unlikely to fix a contract violation.
async fn call_with_retry<L, T, F>(
    service: ExternalService,
    llm: &L,
    request: LlmRequest,
    policy: &RetryPolicy,
    parse: F,
) -> Result<T, ExternalCallError>
where
    L: LlmPort + ?Sized,
    F: Fn(&LlmResponse) -> Result<T, ExternalCallError>,
{
    let mut attempt: u32 = 0;
    loop {
        let outcome = match timeout(policy.timeout, llm.generate(request.clone())).await {
            Err(_) => Err(ExternalCallError::Timeout {
                service,
                timeout_ms: policy.timeout.as_millis() as u64,
            }),
            Ok(Err(e)) => Err(ExternalCallError::Backend {
                service,
                message: e.to_string(),
            }),
            Ok(Ok(response)) if response.content.trim().is_empty() => {
                Err(ExternalCallError::EmptyReply(service))
            }
            Ok(Ok(response)) => parse(&response),
        };

        match outcome {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < policy.max_retries => {
                attempt += 1;
                let delay = policy.base_delay * attempt;
                tracing::warn!(
                    "{} call failed (attempt {}/{}), retrying in {:?}: {}",
                    service,
                    attempt,
                    policy.max_retries + 1,
                    delay,
                    e
                );
                sleep(delay).await;
            }
            Err(e) => {
                tracing::error!("{} call failed after {} attempt(s): {}", service, attempt + 1, e);
                return Err(e);
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::domain::value_objects::{
        CalculationResult, DifficultyRating, Modifiers, RealmStage, ValueKind,
    };
    use std::sync::atomic::Ordering;

    fn service(
        assistant: Option<ScriptedLlm>,
        narrator: Option<ScriptedLlm>,
    ) -> (
        AiHandoffService<ScriptedLlm, ScriptedLlm>,
        Option<Arc<ScriptedLlm>>,
        Option<Arc<ScriptedLlm>>,
    ) {
        let assistant = assistant.map(Arc::new);
        let narrator = narrator.map(Arc::new);
        let service = AiHandoffService::new(assistant.clone(), narrator.clone())
            .with_assistant_policy(fast_policy())
            .with_narrator_policy(fast_policy());
        (service, assistant, narrator)
    }

    #[test]
    fn test_parse_fenced_reply() {
        let raw = format!("Sure!\n```json\n{}\n```\nGood luck.", COMBAT_REPLY);
        let assessment = AssistantAssessment::parse(&raw).unwrap();
        assert_eq!(assessment.scenario, ScenarioType::Combat);
        assert_eq!(assessment.recommended_processing, RecommendedProcessing::Programmatic);
        assert_eq!(assessment.factors_to_consider, vec!["enemy strength".to_string()]);
    }

    #[test]
    fn test_parse_embedded_object_and_aliases() {
        let raw = r#"Here you go: {"scenario_type":"pill_absorption","confidence":0.7,"recommended_processing":"balanced","basic_calculation":{"success_rate":60}} thanks"#;
        let assessment = AssistantAssessment::parse(raw).unwrap();
        assert_eq!(assessment.scenario, ScenarioType::PillConsumption);
        assert_eq!(
            assessment.basic_calculation.and_then(|b| b.success_rate),
            Some(60.0)
        );
    }

    #[test]
    fn test_parse_rejects_contract_violations() {
        for raw in [
            r#"{"scenario_type":"其他","confidence":0.9,"recommended_processing":"balanced"}"#,
            r#"{"scenario_type":"combat","confidence":1.7,"recommended_processing":"balanced"}"#,
            r#"{"scenario_type":"combat","confidence":0.9,"recommended_processing":"vibes"}"#,
            "I think this is combat.",
        ] {
            let err = AssistantAssessment::parse(raw).unwrap_err();
            assert!(matches!(err, ExternalCallError::MalformedReply { .. }), "{}", raw);
            assert!(!err.is_retryable());
        }
    }

    #[tokio::test]
    async fn test_assess_unavailable_without_assistant() {
        let (service, _, _) = service(None, None);
        let err = service
            .assess("attack", &SituationalContext::default(), None)
            .await
            .unwrap_err();
        assert_eq!(err, ExternalCallError::Unavailable(ExternalService::Assistant));
    }

    #[tokio::test]
    async fn test_assess_retries_transient_failures() {
        let assistant = ScriptedLlm::new(vec![Err("502 bad gateway"), Ok("   "), Ok(COMBAT_REPLY)]);
        let (service, assistant, _) = service(Some(assistant), None);

        let assessment = service
            .assess("attack the cultist", &SituationalContext::default(), None)
            .await
            .unwrap();
        assert_eq!(assessment.scenario, ScenarioType::Combat);
        assert_eq!(assistant.unwrap().call_count(), 3);
    }

    #[tokio::test]
    async fn test_malformed_reply_is_not_retried() {
        let assistant = ScriptedLlm::always(r#"{"scenario_type":"dancing","confidence":0.9}"#);
        let (service, assistant, _) = service(Some(assistant), None);

        let err = service
            .assess("dance", &SituationalContext::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ExternalCallError::MalformedReply { .. }));
        assert_eq!(assistant.unwrap().call_count(), 1);
    }

    #[tokio::test]
    async fn test_backend_failure_exhausts_retries() {
        let (service, assistant, _) = service(Some(ScriptedLlm::failing()), None);
        let err = service
            .assess("attack", &SituationalContext::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ExternalCallError::Backend { .. }));
        assert_eq!(assistant.unwrap().call_count(), 3);
    }

    #[tokio::test]
    async fn test_timeout_is_retried_then_reported() {
        let slow = Arc::new(SlowLlm::new(Duration::from_millis(500)));
        let service: AiHandoffService<SlowLlm, ScriptedLlm> =
            AiHandoffService::new(Some(slow.clone()), None).with_assistant_policy(RetryPolicy {
                max_retries: 1,
                base_delay: Duration::from_millis(1),
                timeout: Duration::from_millis(20),
            });

        let err = service
            .assess("attack", &SituationalContext::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ExternalCallError::Timeout { timeout_ms: 20, .. }));
        assert_eq!(slow.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_narrator_receives_authoritative_numbers() {
        let (service, _, narrator) = service(None, Some(ScriptedLlm::always("Your blade flashes.")));
        let calculation = CalculationResult {
            kind: ValueKind::SuccessRate,
            base_value: 40.0,
            modifiers: Modifiers::default(),
            final_value: 62.5,
            critical_success: false,
            critical_failure: false,
            difficulty: DifficultyRating::Normal,
        };
        let player = PlayerSnapshot::new(3, RealmStage::Perfected);
        let request = NarrationRequest {
            calculation: Some(&calculation),
            player: Some(&player),
            ..NarrationRequest::new("attack the cultist", ScenarioType::Combat)
        };

        let narration = service.narrate_or_fallback(&request).await;
        assert_eq!(narration.content, "Your blade flashes.");
        assert!(!narration.degraded);

        let sent = narrator.unwrap().last_request().unwrap();
        assert!(sent.messages[0].content.contains("62.5"));
        assert!(sent.system_prompt.unwrap().contains("AUTHORITATIVE"));
    }

    #[tokio::test]
    async fn test_narrator_failure_degrades_to_template() {
        let (service, _, narrator) = service(None, Some(ScriptedLlm::failing()));
        let request = NarrationRequest::new("wander about", ScenarioType::Exploration);

        let narration = service.narrate_or_fallback(&request).await;
        assert!(narration.degraded);
        assert!(narration.content.contains("[Exploration]"));
        assert_eq!(narration.completion_tokens, None);
        assert_eq!(narrator.unwrap().call_count(), 3);
    }

    #[tokio::test]
    async fn test_narration_reports_completion_tokens() {
        let narrator = ScriptedLlm::always("The pill dissolves.").with_completion_tokens(42);
        let (service, _, _) = service(None, Some(narrator));
        let request = NarrationRequest::new("swallow the pill", ScenarioType::PillConsumption);

        let narration = service.narrate(&request).await.unwrap();
        assert_eq!(narration.content, "The pill dissolves.");
        assert_eq!(narration.completion_tokens, Some(42));
    }

    #[tokio::test]
    async fn test_backend_status_reports_each_service() {
        let (mixed, _, _) = service(
            Some(ScriptedLlm::always(COMBAT_REPLY)),
            Some(ScriptedLlm::failing()),
        );
        let status = mixed.backend_status().await;
        assert_eq!(status.assistant, BackendHealth::Up);
        assert_eq!(status.narrator, BackendHealth::Down);

        let (offline, _, _) = service(None, None);
        let status = offline.backend_status().await;
        assert_eq!(status.assistant, BackendHealth::Disabled);
        assert_eq!(status.narrator, BackendHealth::Disabled);
    }
}
