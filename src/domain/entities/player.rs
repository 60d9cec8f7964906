//! Player snapshot - the character state a single action is resolved against

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::realm::{realm_name, MAX_REALM};
use crate::domain::value_objects::{InfluenceFactor, LuckLevel, RealmStage};

/// Neutral attribute value; the calculation engine measures against it
pub const BASELINE_ATTRIBUTE: f64 = 50.0;

fn baseline() -> f64 {
    BASELINE_ATTRIBUTE
}

/// Core character attributes, 50 is average
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(default = "baseline")]
    pub strength: f64,
    #[serde(default = "baseline")]
    pub intelligence: f64,
    #[serde(default = "baseline")]
    pub charm: f64,
    #[serde(default = "baseline")]
    pub constitution: f64,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            strength: BASELINE_ATTRIBUTE,
            intelligence: BASELINE_ATTRIBUTE,
            charm: BASELINE_ATTRIBUTE,
            constitution: BASELINE_ATTRIBUTE,
        }
    }
}

/// Snapshot of the acting player, supplied fresh per request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Realm index, 0 (mortal) to 8
    pub realm: u8,
    #[serde(default)]
    pub stage: RealmStage,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub luck: LuckLevel,
    #[serde(default)]
    pub influence_factors: Vec<InfluenceFactor>,
}

impl PlayerSnapshot {
    pub fn new(realm: u8, stage: RealmStage) -> Self {
        Self {
            realm,
            stage,
            attributes: Attributes::default(),
            luck: LuckLevel::Normal,
            influence_factors: Vec::new(),
        }
    }

    pub fn with_luck(mut self, luck: LuckLevel) -> Self {
        self.luck = luck;
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn realm_name(&self) -> &'static str {
        realm_name(self.realm.min(MAX_REALM)).unwrap_or("渡劫")
    }

    /// e.g. "金丹圆满"
    pub fn cultivation_label(&self) -> String {
        format!("{}{}", self.realm_name(), self.stage.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_json_fills_defaults() {
        let player: PlayerSnapshot = serde_json::from_str(r#"{"realm":3,"stage":"圆满"}"#).unwrap();
        assert_eq!(player.stage, RealmStage::Perfected);
        assert_eq!(player.luck, LuckLevel::Normal);
        assert_eq!(player.attributes.strength, BASELINE_ATTRIBUTE);
        assert!(player.influence_factors.is_empty());
    }

    #[test]
    fn test_partial_attributes_keep_baseline() {
        let player: PlayerSnapshot =
            serde_json::from_str(r#"{"realm":1,"attributes":{"strength":72}}"#).unwrap();
        assert_eq!(player.attributes.strength, 72.0);
        assert_eq!(player.attributes.charm, BASELINE_ATTRIBUTE);
    }

    #[test]
    fn test_cultivation_label() {
        let player = PlayerSnapshot::new(3, RealmStage::Perfected);
        assert_eq!(player.cultivation_label(), "金丹圆满");
    }
}
