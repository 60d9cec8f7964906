//! Configuration recommender - maps a host's needs onto a `RecognitionConfig`

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{MatchPrecision, RecognitionConfig, RecognitionMethod};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameComplexity {
    Simple,
    #[default]
    Moderate,
    Complex,
}

/// What the host cares about most
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationNeeds {
    pub prioritize_speed: bool,
    pub prioritize_cost: bool,
    pub prioritize_accuracy: bool,
    pub has_ai_access: bool,
    pub game_complexity: GameComplexity,
}

pub struct ConfigurationRecommender;

impl ConfigurationRecommender {
    /// Needs are applied in order speed, cost, accuracy, complexity; later ones override
    pub fn recommend(needs: &RecommendationNeeds) -> RecognitionConfig {
        let mut config = RecognitionConfig::default();

        if needs.prioritize_speed {
            config.method = RecognitionMethod::TextPrimary;
            config.text_match_precision = MatchPrecision::Loose;
            config.cache_results = true;
            config.preferences.prefer_speed = true;
        }

        if needs.prioritize_cost {
            config.method = if needs.has_ai_access {
                RecognitionMethod::TextPrimary
            } else {
                RecognitionMethod::TextOnly
            };
            config.ai_backup_enabled = false;
            config.preferences.prefer_cost = true;
        }

        if needs.prioritize_accuracy {
            config.method = if needs.has_ai_access {
                RecognitionMethod::Hybrid
            } else {
                RecognitionMethod::TextOnly
            };
            config.text_match_precision = MatchPrecision::Strict;
            config.ai_backup_enabled = true;
            config.preferences.prefer_accuracy = true;
        }

        if needs.game_complexity == GameComplexity::Complex {
            config.method = RecognitionMethod::AiPrimary;
            config.enable_programmatic_calculation = true;
        }

        config
    }

    pub fn explain(config: &RecognitionConfig) -> String {
        let method = match config.method {
            RecognitionMethod::TextOnly => {
                "Text matching only: fastest and cheapest, with limited accuracy"
            }
            RecognitionMethod::TextPrimary => {
                "Text first: pattern matching, with the assistant as backup when unsure"
            }
            RecognitionMethod::AiPrimary => {
                "Assistant first: AI recognition, with text matching as backup"
            }
            RecognitionMethod::Hybrid => {
                "Hybrid: assistant and text matching together, most accurate"
            }
        };
        let on_off = |enabled: bool| if enabled { "enabled" } else { "disabled" };

        let mut explanation = String::from("Current configuration:\n\n");
        explanation.push_str(method);
        explanation.push('\n');
        explanation.push_str(&format!(
            "Text match precision: {} (strict/moderate/loose)\n",
            config.text_match_precision.as_str()
        ));
        explanation.push_str(&format!(
            "Programmatic calculation: {}\n",
            on_off(config.enable_programmatic_calculation)
        ));
        explanation.push_str(&format!("AI backup: {}\n", on_off(config.ai_backup_enabled)));
        explanation.push_str(&format!("Result cache: {}\n", on_off(config.cache_results)));
        explanation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_prefers_loose_text_matching() {
        let config = ConfigurationRecommender::recommend(&RecommendationNeeds {
            prioritize_speed: true,
            ..Default::default()
        });
        assert_eq!(config.method, RecognitionMethod::TextPrimary);
        assert_eq!(config.text_match_precision, MatchPrecision::Loose);
        assert!(config.cache_results);
    }

    #[test]
    fn test_cost_without_ai_access_is_text_only() {
        let config = ConfigurationRecommender::recommend(&RecommendationNeeds {
            prioritize_cost: true,
            ..Default::default()
        });
        assert_eq!(config.method, RecognitionMethod::TextOnly);
        assert!(!config.ai_backup_enabled);
        assert!(config.preferences.prefer_cost);
    }

    #[test]
    fn test_later_needs_override_earlier_ones() {
        let config = ConfigurationRecommender::recommend(&RecommendationNeeds {
            prioritize_speed: true,
            prioritize_accuracy: true,
            has_ai_access: true,
            ..Default::default()
        });
        assert_eq!(config.method, RecognitionMethod::Hybrid);
        assert_eq!(config.text_match_precision, MatchPrecision::Strict);

        let config = ConfigurationRecommender::recommend(&RecommendationNeeds {
            prioritize_cost: true,
            has_ai_access: true,
            game_complexity: GameComplexity::Complex,
            ..Default::default()
        });
        assert_eq!(config.method, RecognitionMethod::AiPrimary);
        assert!(!config.ai_backup_enabled);
    }

    #[test]
    fn test_explain_mentions_every_setting() {
        let text = ConfigurationRecommender::explain(&RecognitionConfig::default());
        assert!(text.contains("Hybrid"));
        assert!(text.contains("moderate"));
        assert!(text.contains("Result cache: enabled"));
    }
}
