//! Local templated narration
//!
//! Used for every path that does not end at the narrator, and as the
//! fallback when the narrator cannot be reached.

use crate::domain::value_objects::{CalculationResult, ScenarioType, ValueKind};

/// Confidence below which the template lists alternative readings
pub const ALTERNATIVES_BELOW: f64 = 0.6;

pub struct NarrationTemplates;

impl NarrationTemplates {
    pub fn scenario_flavour(scenario: ScenarioType) -> &'static str {
        match scenario {
            ScenarioType::Combat => "You settle into a fighting stance, ready to meet the challenge...",
            ScenarioType::Breakthrough => "You reach for the next realm, excited and uneasy in equal measure...",
            ScenarioType::Cultivation => "You calm your mind and let spiritual qi flow through your meridians...",
            ScenarioType::Alchemy => "You light the furnace and coax the herbs into fusion, watching the flame...",
            ScenarioType::Crafting => "You work the metal, every hammer blow carrying your intent...",
            ScenarioType::FormationBreaking => "You study the formation's lines, searching for the key...",
            ScenarioType::Social => "You gather your courage for the conversation ahead...",
            ScenarioType::Exploration => "You step forward into the unknown...",
            ScenarioType::Negotiation => "You weigh your words and your spirit stones carefully...",
            ScenarioType::PillConsumption => "You swallow the pill and feel its power spread through your body...",
            ScenarioType::BeastTaming => "You approach the beast slowly, letting it take your measure...",
        }
    }

    /// Full local narration for a resolved action
    pub fn render(
        input: &str,
        scenario: ScenarioType,
        confidence: f64,
        calculation: Option<&CalculationResult>,
        reasoning: &[String],
        alternatives: &[ScenarioType],
    ) -> String {
        let mut content = format!("You decide to {}.\n\n", input.trim());

        if let Some(calculation) = calculation {
            content.push_str(&Self::calculation_lines(calculation));
        }

        content.push('\n');
        content.push_str(Self::scenario_flavour(scenario));

        if confidence < ALTERNATIVES_BELOW && !alternatives.is_empty() {
            let labels: Vec<&str> = alternatives.iter().map(|s| s.display_name()).collect();
            content.push_str(&format!(
                "\n\n(Unsure what you meant. Did you intend: {}?)",
                labels.join(", ")
            ));
        }

        if !reasoning.is_empty() {
            content.push_str(&format!("\n\n(Recognised by: {})", reasoning.join("; ")));
        }

        content
    }

    /// Stand-in when the narrator is unavailable: names the scenario and the numbers
    pub fn fallback(input: &str, scenario: ScenarioType, calculation: Option<&CalculationResult>) -> String {
        let mut content = format!(
            "[{}] You decide to {}.\n",
            scenario.display_name(),
            input.trim()
        );
        match calculation {
            Some(calculation) => content.push_str(&Self::calculation_lines(calculation)),
            None => content.push_str("The outcome is left to fate.\n"),
        }
        content.push('\n');
        content.push_str(Self::scenario_flavour(scenario));
        content
    }

    fn calculation_lines(calculation: &CalculationResult) -> String {
        let mut lines = String::new();
        match calculation.kind {
            ValueKind::SuccessRate => lines.push_str(&format!(
                "Based on the current assessment, your chance of success is about {:.1}% ({}).\n",
                calculation.final_value,
                calculation.difficulty.display_name()
            )),
            ValueKind::EffectValue => lines.push_str(&format!(
                "Expected effect value: {:.1}.\n",
                calculation.final_value
            )),
        }

        if calculation.critical_success {
            lines.push_str("Fortune smiles on you: a critical success!\n");
        } else if calculation.critical_failure {
            lines.push_str("Fate turns against you: a critical failure!\n");
        }

        let terms: Vec<String> = calculation
            .breakdown()
            .into_iter()
            .filter(|(term, _)| *term != "base")
            .map(|(term, value)| format!("- {}: {:+.1}", term, value))
            .collect();
        if !terms.is_empty() {
            lines.push_str("\nInfluences:\n");
            lines.push_str(&terms.join("\n"));
            lines.push('\n');
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{DifficultyRating, Modifiers};

    fn calculation() -> CalculationResult {
        CalculationResult {
            kind: ValueKind::SuccessRate,
            base_value: 40.0,
            modifiers: Modifiers {
                realm: 12.0,
                luck: -8.0,
                ..Default::default()
            },
            final_value: 44.0,
            critical_success: false,
            critical_failure: true,
            difficulty: DifficultyRating::Hard,
        }
    }

    #[test]
    fn test_render_includes_numbers_and_reasoning() {
        let calc = calculation();
        let text = NarrationTemplates::render(
            "attack the cultist",
            ScenarioType::Combat,
            0.95,
            Some(&calc),
            &["exact match: attack".to_string()],
            &[ScenarioType::Social],
        );
        assert!(text.starts_with("You decide to attack the cultist."));
        assert!(text.contains("44.0%"));
        assert!(text.contains("- realm: +12.0"));
        assert!(text.contains("- luck: -8.0"));
        assert!(text.contains("critical failure"));
        assert!(text.contains("exact match: attack"));
        assert!(!text.contains("Did you intend"));
    }

    #[test]
    fn test_low_confidence_lists_alternatives() {
        let text = NarrationTemplates::render(
            "hum a tune",
            ScenarioType::Exploration,
            0.3,
            None,
            &[],
            &[ScenarioType::Exploration, ScenarioType::Social],
        );
        assert!(text.contains("Did you intend: Exploration, Social Interaction?"));
    }

    #[test]
    fn test_fallback_names_scenario_and_numbers() {
        let calc = calculation();
        let text = NarrationTemplates::fallback("attack", ScenarioType::Combat, Some(&calc));
        assert!(text.contains("[Combat]"));
        assert!(text.contains("44.0%"));

        let text = NarrationTemplates::fallback("wander", ScenarioType::Exploration, None);
        assert!(text.contains("left to fate"));
    }
}
