//! Realm and stage lookup tables
//!
//! Realms are the coarse power tiers (0 = mortal .. 8 = tribulation); stages
//! subdivide each realm. Both feed the calculation engine as table lookups.

use serde::{Deserialize, Serialize};

pub const MAX_REALM: u8 = 8;

const REALM_NAMES: [&str; 9] = [
    "凡人", "炼气", "筑基", "金丹", "元婴", "化神", "炼虚", "合体", "渡劫",
];

/// Chinese name of a realm, `None` beyond the last realm
pub fn realm_name(realm: u8) -> Option<&'static str> {
    REALM_NAMES.get(realm as usize).copied()
}

/// Sub-tier inside a realm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RealmStage {
    #[serde(rename = "初期", alias = "early")]
    Early,
    #[serde(rename = "中期", alias = "middle")]
    Middle,
    #[serde(rename = "后期", alias = "late")]
    Late,
    #[serde(rename = "圆满", alias = "perfected")]
    Perfected,
    #[serde(rename = "极境", alias = "peak")]
    Peak,
}

impl Default for RealmStage {
    fn default() -> Self {
        Self::Early
    }
}

impl RealmStage {
    pub const ALL: [RealmStage; 5] = [
        Self::Early,
        Self::Middle,
        Self::Late,
        Self::Perfected,
        Self::Peak,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Early => "初期",
            Self::Middle => "中期",
            Self::Late => "后期",
            Self::Perfected => "圆满",
            Self::Peak => "极境",
        }
    }

    pub fn combat_bonus(&self) -> f64 {
        match self {
            Self::Early => 5.0,
            Self::Middle => 10.0,
            Self::Late => 15.0,
            Self::Perfected => 25.0,
            Self::Peak => 40.0,
        }
    }

    /// Breakthrough adjustment; a peak stage is the hardest to leave
    pub fn breakthrough_bonus(&self) -> f64 {
        match self {
            Self::Early => -10.0,
            Self::Middle => -5.0,
            Self::Late => 0.0,
            Self::Perfected => 10.0,
            Self::Peak => -20.0,
        }
    }

    pub fn resource_multiplier(&self) -> f64 {
        match self {
            Self::Early => 1.0,
            Self::Middle => 1.3,
            Self::Late => 1.6,
            Self::Perfected => 2.0,
            Self::Peak => 3.0,
        }
    }

    /// Craft proficiency gained within a realm (alchemy, crafting, formations)
    pub fn proficiency_bonus(&self) -> f64 {
        match self {
            Self::Early => 0.0,
            Self::Middle => 2.0,
            Self::Late => 4.0,
            Self::Perfected => 6.0,
            Self::Peak => 10.0,
        }
    }
}

impl std::fmt::Display for RealmStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How hard it is to leave a realm at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakthroughTier {
    Ordinary,
    Hard,
    Extreme,
    HeavenDefying,
}

impl BreakthroughTier {
    pub fn for_realm(realm: u8) -> Self {
        match realm {
            0..=2 => Self::Ordinary,
            3..=4 => Self::Hard,
            5..=6 => Self::Extreme,
            _ => Self::HeavenDefying,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Ordinary => "普通",
            Self::Hard => "困难",
            Self::Extreme => "极难",
            Self::HeavenDefying => "逆天",
        }
    }
}
