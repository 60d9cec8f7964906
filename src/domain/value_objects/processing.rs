//! Processing results - what a resolved player action looks like to the host

use serde::{Deserialize, Serialize};

use super::{CalculationResult, ScenarioType};

/// The branch the router actually took
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMethod {
    TextOnly,
    TextPrimary,
    TextPrimaryAiBackup,
    TextPrimaryFallback,
    AiPrimary,
    AiPrimaryTextBackup,
    HybridTextDominant,
    HybridAiDominant,
    HybridTextPreferred,
    HybridAiPreferred,
    HybridTextOnly,
    HybridFallback,
}

impl ProcessingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextOnly => "text_only",
            Self::TextPrimary => "text_primary",
            Self::TextPrimaryAiBackup => "text_primary_ai_backup",
            Self::TextPrimaryFallback => "text_primary_fallback",
            Self::AiPrimary => "ai_primary",
            Self::AiPrimaryTextBackup => "ai_primary_text_backup",
            Self::HybridTextDominant => "hybrid_text_dominant",
            Self::HybridAiDominant => "hybrid_ai_dominant",
            Self::HybridTextPreferred => "hybrid_text_preferred",
            Self::HybridAiPreferred => "hybrid_ai_preferred",
            Self::HybridTextOnly => "hybrid_text_only",
            Self::HybridFallback => "hybrid_fallback",
        }
    }

    /// Whether the assistant's assessment chose the scenario
    pub fn is_ai_driven(&self) -> bool {
        matches!(
            self,
            Self::TextPrimaryAiBackup | Self::AiPrimary | Self::HybridAiDominant | Self::HybridAiPreferred
        )
    }

    /// Branches that exist only because a preferred path was skipped or failed
    pub fn is_fallback(&self) -> bool {
        matches!(
            self,
            Self::TextPrimaryFallback
                | Self::AiPrimaryTextBackup
                | Self::HybridTextOnly
                | Self::HybridFallback
        )
    }
}

impl std::fmt::Display for ProcessingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Externally visible outcome of `resolve_action`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub scenario: ScenarioType,
    pub confidence: f64,
    pub method: ProcessingMethod,
    pub calculation: Option<CalculationResult>,
    pub final_content: String,
    pub processing_time_ms: u64,
    pub cost_estimate: f64,
    /// An external call failed and a local fallback stood in for it
    pub degraded: bool,
    pub classification_reasoning: Vec<String>,
    pub input: String,
}

impl ProcessingResult {
    /// Equality ignoring the timing field
    pub fn same_outcome(&self, other: &Self) -> bool {
        Self {
            processing_time_ms: 0,
            ..self.clone()
        } == Self {
            processing_time_ms: 0,
            ..other.clone()
        }
    }
}
