//! Prompt building functions for the assistant and narrator calls

use crate::application::ports::outbound::ChatMessage;
use crate::application::services::ai_handoff_service::{AssistantAssessment, RecommendedProcessing};
use crate::domain::entities::{PlayerSnapshot, SituationalContext};
use crate::domain::value_objects::{
    BreakthroughTier, CalculationResult, InfluenceFactor, LuckLevel, ScenarioType, ValueKind,
};

/// Everything the narrator needs to write up one resolved action
#[derive(Debug, Clone, Copy)]
pub struct NarrationRequest<'a> {
    pub input: &'a str,
    pub scenario: ScenarioType,
    pub assessment: Option<&'a AssistantAssessment>,
    pub calculation: Option<&'a CalculationResult>,
    pub luck: Option<LuckLevel>,
    pub factors: &'a [InfluenceFactor],
    pub player: Option<&'a PlayerSnapshot>,
}

impl<'a> NarrationRequest<'a> {
    pub fn new(input: &'a str, scenario: ScenarioType) -> Self {
        Self {
            input,
            scenario,
            assessment: None,
            calculation: None,
            luck: None,
            factors: &[],
            player: None,
        }
    }
}

/// System prompt for the structured classification call
pub fn build_assistant_system_prompt() -> String {
    let labels: Vec<&str> = ScenarioType::ALL.iter().map(|s| s.as_str()).collect();

    let mut prompt = String::new();
    prompt.push_str("You are the scenario recognition assistant of a cultivation role-playing game.\n");
    prompt.push_str("Classify the player's action and estimate a baseline outcome.\n\n");
    prompt.push_str(&format!("Allowed scenario_type values: {}\n", labels.join(", ")));
    prompt.push_str("Allowed recommended_processing values: programmatic, ai_heavy, balanced\n\n");
    prompt.push_str(
        r#"Reply with a single JSON object and nothing else:
{
  "scenario_type": "combat",
  "confidence": 0.95,
  "basic_calculation": {
    "success_rate": 75,
    "effect_value": 120,
    "difficulty_assessment": "moderate"
  },
  "factors_to_consider": ["talent", "environment", "state of mind"],
  "recommended_processing": "balanced",
  "reasoning": "why this scenario"
}
"#,
    );
    prompt
}

/// User message for the classification call
pub fn build_assistant_message(
    input: &str,
    context: &SituationalContext,
    player: Option<&PlayerSnapshot>,
) -> ChatMessage {
    let mut message = format!("Player input: \"{}\"\n", input);

    if !context.is_empty() {
        let context_json = serde_json::to_string(context).unwrap_or_default();
        message.push_str(&format!("Game context: {}\n", context_json));
    }

    if let Some(player) = player {
        message.push_str(&format!(
            "Player cultivation: realm {} ({}), stage {}\n",
            player.realm,
            player.realm_name(),
            player.stage
        ));
    }

    message.push_str("\nReturn JSON only.");
    ChatMessage::user(message)
}

/// System prompt for the narration call
pub fn build_narrator_system_prompt() -> String {
    let mut prompt = String::new();
    prompt.push_str("You are the narrator of a cultivation role-playing game.\n");
    prompt.push_str("Turn the resolved action below into vivid second-person prose.\n\n");
    prompt.push_str("RULES:\n");
    prompt.push_str("- Any computed numbers you are given are AUTHORITATIVE. Do not recompute, alter or contradict them; only elaborate on them.\n");
    prompt.push_str("- A critical success or critical failure must be unmistakable in the prose.\n");
    prompt.push_str("- Weave every listed influence into the scene.\n");
    prompt.push_str("- Keep it to two or three short paragraphs.\n");
    prompt
}

/// User message for the narration call
pub fn build_narrator_message(request: &NarrationRequest<'_>) -> ChatMessage {
    let mut message = String::new();

    message.push_str(&format!("PLAYER ACTION: {}\n", request.input));
    message.push_str(&format!(
        "SCENARIO: {} ({})\n",
        request.scenario.display_name(),
        request.scenario.as_str()
    ));

    if let Some(assessment) = request.assessment {
        message.push_str(&format!(
            "PROCESSING: {}\n",
            assessment.recommended_processing.as_str()
        ));
        if assessment.recommended_processing != RecommendedProcessing::Programmatic
            && !assessment.factors_to_consider.is_empty()
        {
            message.push_str(&format!(
                "FACTORS TO CONSIDER: {}\n",
                assessment.factors_to_consider.join(", ")
            ));
        }
    }

    if let Some(player) = request.player {
        message.push_str(&format!("PLAYER: {}\n", player.cultivation_label()));
        if request.scenario == ScenarioType::Breakthrough {
            message.push_str(&format!(
                "BREAKTHROUGH TIER: {}\n",
                BreakthroughTier::for_realm(player.realm).name()
            ));
        }
    }

    if let Some(luck) = request.luck {
        message.push_str(&format!("FORTUNE: {}\n", luck.description()));
    }
    message.push('\n');

    match request.calculation {
        Some(calculation) => {
            message.push_str("=== COMPUTED RESULT (authoritative, do not change) ===\n");
            let label = match calculation.kind {
                ValueKind::SuccessRate => "Success rate",
                ValueKind::EffectValue => "Effect value",
            };
            message.push_str(&format!("{}: {:.1}\n", label, calculation.final_value));
            if calculation.kind == ValueKind::SuccessRate {
                message.push_str(&format!(
                    "Difficulty: {}\n",
                    calculation.difficulty.display_name()
                ));
            }
            message.push_str("Breakdown:\n");
            for (term, value) in calculation.breakdown() {
                message.push_str(&format!("  - {}: {:+.1}\n", term, value));
            }
            if calculation.critical_success {
                message.push_str("CRITICAL SUCCESS\n");
            } else if calculation.critical_failure {
                message.push_str("CRITICAL FAILURE\n");
            }
            message.push('\n');
        }
        None => {
            if let Some(basic) = request.assessment.and_then(|a| a.basic_calculation.as_ref()) {
                message.push_str("=== ASSISTANT ESTIMATE (reference only) ===\n");
                if let Some(rate) = basic.success_rate {
                    message.push_str(&format!("Estimated success rate: {:.0}%\n", rate));
                }
                if let Some(difficulty) = &basic.difficulty_assessment {
                    message.push_str(&format!("Estimated difficulty: {}\n", difficulty));
                }
                message.push('\n');
            }
        }
    }

    if !request.factors.is_empty() {
        message.push_str("INFLUENCES:\n");
        for factor in request.factors {
            message.push_str(&format!(
                "  - {}: {} [{}]\n",
                factor.name,
                factor.text_effect,
                factor.importance.display_name()
            ));
        }
        message.push('\n');
    }

    message.push_str("Narrate the outcome. The numbers above are final.");
    ChatMessage::user(message)
}
