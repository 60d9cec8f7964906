//! Scenario types - the closed set of player-intent categories

use serde::{Deserialize, Serialize};

/// One closed category of player intent
///
/// Every free-text action is classified into exactly one of these. The set is
/// fixed at compile time; rule sets may omit scenarios but never invent new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioType {
    Combat,
    Breakthrough,
    Cultivation,
    Alchemy,
    Crafting,
    FormationBreaking,
    Social,
    Exploration,
    Negotiation,
    PillConsumption,
    BeastTaming,
}

impl ScenarioType {
    pub const ALL: [ScenarioType; 11] = [
        Self::Combat,
        Self::Breakthrough,
        Self::Cultivation,
        Self::Alchemy,
        Self::Crafting,
        Self::FormationBreaking,
        Self::Social,
        Self::Exploration,
        Self::Negotiation,
        Self::PillConsumption,
        Self::BeastTaming,
    ];

    /// Stable snake_case identifier, identical to the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Combat => "combat",
            Self::Breakthrough => "breakthrough",
            Self::Cultivation => "cultivation",
            Self::Alchemy => "alchemy",
            Self::Crafting => "crafting",
            Self::FormationBreaking => "formation_breaking",
            Self::Social => "social",
            Self::Exploration => "exploration",
            Self::Negotiation => "negotiation",
            Self::PillConsumption => "pill_consumption",
            Self::BeastTaming => "beast_taming",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Combat => "Combat",
            Self::Breakthrough => "Realm Breakthrough",
            Self::Cultivation => "Cultivation",
            Self::Alchemy => "Alchemy",
            Self::Crafting => "Artifact Crafting",
            Self::FormationBreaking => "Formation Breaking",
            Self::Social => "Social Interaction",
            Self::Exploration => "Exploration",
            Self::Negotiation => "Negotiation",
            Self::PillConsumption => "Pill Consumption",
            Self::BeastTaming => "Beast Taming",
        }
    }

    /// Parse a label produced by an external model.
    ///
    /// Accepts the canonical identifiers, a few legacy aliases and the Chinese
    /// scenario names. Anything else is rejected so that unknown labels never
    /// flow into calculations.
    pub fn parse_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_lowercase().replace(['-', ' '], "_");
        let scenario = match normalized.as_str() {
            "combat" | "fight" | "battle" | "战斗" => Self::Combat,
            "breakthrough" | "突破" => Self::Breakthrough,
            "cultivation" | "修炼" => Self::Cultivation,
            "alchemy" | "炼丹" => Self::Alchemy,
            "crafting" | "炼器" => Self::Crafting,
            "formation_breaking" | "破阵" => Self::FormationBreaking,
            "social" | "社交" => Self::Social,
            "exploration" | "探索" => Self::Exploration,
            "negotiation" | "谈判" => Self::Negotiation,
            "pill_consumption" | "pill_absorption" | "服用丹药" => Self::PillConsumption,
            "beast_taming" | "驯兽" => Self::BeastTaming,
            _ => return None,
        };
        Some(scenario)
    }
}

impl std::fmt::Display for ScenarioType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
