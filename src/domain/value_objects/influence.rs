//! Influence factors - situational modifiers supplied per action

use serde::{Deserialize, Serialize};

/// Category of a situational modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorType {
    Attribute,
    Equipment,
    Talent,
    Environment,
    Relationship,
    Mood,
    Special,
}

/// How strongly a factor weighs in the deterministic sum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Critical,
    Major,
    Minor,
}

impl Importance {
    pub fn weight(&self) -> f64 {
        match self {
            Self::Critical => 2.0,
            Self::Major => 1.5,
            Self::Minor => 0.5,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Major => "major",
            Self::Minor => "minor",
        }
    }
}

/// One situational modifier
///
/// Only factors with a `numeric_value` take part in the arithmetic; every
/// factor, numeric or not, is forwarded to the narrator via `text_effect`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluenceFactor {
    #[serde(rename = "type")]
    pub factor_type: FactorType,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub numeric_value: Option<f64>,
    pub text_effect: String,
    pub importance: Importance,
}

impl InfluenceFactor {
    pub fn new(
        factor_type: FactorType,
        name: impl Into<String>,
        text_effect: impl Into<String>,
        importance: Importance,
    ) -> Self {
        Self {
            factor_type,
            name: name.into(),
            description: String::new(),
            numeric_value: None,
            text_effect: text_effect.into(),
            importance,
        }
    }

    pub fn with_numeric_value(mut self, value: f64) -> Self {
        self.numeric_value = Some(value);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Contribution to the deterministic sum, zero for purely textual factors
    pub fn weighted_value(&self) -> f64 {
        self.numeric_value
            .map(|value| value * self.importance.weight())
            .unwrap_or(0.0)
    }
}

/// Importance-weighted sum over all numeric factors
pub fn weighted_sum(factors: &[InfluenceFactor]) -> f64 {
    factors.iter().map(InfluenceFactor::weighted_value).sum()
}
