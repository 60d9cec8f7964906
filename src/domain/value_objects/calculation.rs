//! Calculation results - the auditable numeric outcome of a computable action

use serde::{Deserialize, Serialize};

/// Lowest success rate any scenario may report
pub const MIN_SUCCESS_RATE: f64 = 0.1;
/// Highest success rate any scenario may report, critical results included
pub const MAX_SUCCESS_RATE: f64 = 99.0;

/// What `final_value` measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Percentage chance, bounded to `[0.1, 99]`
    SuccessRate,
    /// Open-ended magnitude (cultivation progress, absorbed potency), never negative
    EffectValue,
}

impl ValueKind {
    pub fn clamp(&self, value: f64) -> f64 {
        match self {
            Self::SuccessRate => value.clamp(MIN_SUCCESS_RATE, MAX_SUCCESS_RATE),
            Self::EffectValue => value.max(0.0),
        }
    }
}

/// Qualitative difficulty band shown alongside a success rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyRating {
    Easy,
    Normal,
    Hard,
    VeryHard,
    NearlyImpossible,
}

impl DifficultyRating {
    pub fn from_success_rate(rate: f64) -> Self {
        if rate >= 80.0 {
            Self::Easy
        } else if rate >= 60.0 {
            Self::Normal
        } else if rate >= 40.0 {
            Self::Hard
        } else if rate >= 20.0 {
            Self::VeryHard
        } else {
            Self::NearlyImpossible
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hard => "hard",
            Self::VeryHard => "very hard",
            Self::NearlyImpossible => "nearly impossible",
        }
    }
}

/// Additive breakdown of a calculation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Modifiers {
    pub luck: f64,
    pub random: f64,
    pub realm: f64,
    pub attribute: f64,
    /// Importance-weighted sum of numeric influence factors
    pub special: f64,
    /// Shift applied by a critical success or failure
    pub critical: f64,
}

impl Modifiers {
    /// Sum of every term that precedes the critical shift
    pub fn pre_critical_total(&self) -> f64 {
        self.luck + self.random + self.realm + self.attribute + self.special
    }
}

/// Numeric outcome produced by the calculation engine
///
/// Invariants: `final_value` lies within `kind`'s bounds, and
/// `critical_success` and `critical_failure` are never both set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub kind: ValueKind,
    pub base_value: f64,
    pub modifiers: Modifiers,
    pub final_value: f64,
    pub critical_success: bool,
    pub critical_failure: bool,
    pub difficulty: DifficultyRating,
}

impl CalculationResult {
    /// One-line human readable summary used by templates and prompts
    pub fn summary(&self) -> String {
        let outcome = match self.kind {
            ValueKind::SuccessRate => format!(
                "success rate {:.1}% ({})",
                self.final_value,
                self.difficulty.display_name()
            ),
            ValueKind::EffectValue => format!("effect value {:.1}", self.final_value),
        };
        if self.critical_success {
            format!("{} [CRITICAL SUCCESS]", outcome)
        } else if self.critical_failure {
            format!("{} [CRITICAL FAILURE]", outcome)
        } else {
            outcome
        }
    }

    /// Labelled non-zero terms, in a stable order
    pub fn breakdown(&self) -> Vec<(&'static str, f64)> {
        let m = &self.modifiers;
        [
            ("base", self.base_value),
            ("realm", m.realm),
            ("attribute", m.attribute),
            ("luck", m.luck),
            ("random", m.random),
            ("special", m.special),
            ("critical", m.critical),
        ]
        .into_iter()
        .filter(|(label, value)| *label == "base" || value.abs() > f64::EPSILON)
        .collect()
    }
}
