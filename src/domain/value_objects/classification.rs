//! Classification results and matching precision

use serde::{Deserialize, Serialize};

use super::ScenarioType;

/// How strictly free text must match a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum MatchPrecision {
    Strict,
    #[default]
    Moderate,
    Loose,
}

impl MatchPrecision {
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Strict => 1.2,
            Self::Moderate => 1.0,
            Self::Loose => 0.8,
        }
    }

    /// Minimum raw score a rule needs before the heuristic takes over
    pub fn threshold(&self) -> f64 {
        match self {
            Self::Strict => 80.0,
            Self::Moderate => 50.0,
            Self::Loose => 25.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Moderate => "moderate",
            Self::Loose => "loose",
        }
    }

    /// Unknown values fall back to moderate
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "strict" => Self::Strict,
            "loose" => Self::Loose,
            "moderate" => Self::Moderate,
            other => {
                tracing::warn!("Unknown match precision '{}', using moderate", other);
                Self::Moderate
            }
        }
    }
}

impl From<String> for MatchPrecision {
    fn from(value: String) -> Self {
        Self::parse_lenient(&value)
    }
}

impl std::str::FromStr for MatchPrecision {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

/// Where a classification came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    RuleMatch,
    Heuristic,
}

/// Outcome of classifying one piece of free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub scenario_type: ScenarioType,
    /// Normalised to `[0, 1]`
    pub confidence: f64,
    /// Raw weighted score before normalisation, zero for heuristic guesses
    pub score: f64,
    pub source: ClassificationSource,
    pub programmatic_calculable: bool,
    pub reasoning: Vec<String>,
    pub matched_rule: Option<ScenarioType>,
}

impl ClassificationResult {
    pub fn heuristic(
        scenario_type: ScenarioType,
        confidence: f64,
        programmatic_calculable: bool,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            scenario_type,
            confidence,
            score: 0.0,
            source: ClassificationSource::Heuristic,
            programmatic_calculable,
            reasoning: vec![reason.into()],
            matched_rule: None,
        }
    }

    pub fn is_heuristic(&self) -> bool {
        self.source == ClassificationSource::Heuristic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_precision_falls_back_to_moderate() {
        let precision: MatchPrecision = serde_json::from_str("\"fuzzy\"").unwrap();
        assert_eq!(precision, MatchPrecision::Moderate);
        let precision: MatchPrecision = serde_json::from_str("\"STRICT\"").unwrap();
        assert_eq!(precision, MatchPrecision::Strict);
    }

    #[test]
    fn test_precision_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&MatchPrecision::Loose).unwrap(), "\"loose\"");
    }
}
