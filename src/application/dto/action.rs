use serde::{Deserialize, Serialize};

use crate::domain::entities::{PlayerSnapshot, SituationalContext};
use crate::domain::value_objects::{
    InfluenceFactor, LuckLevel, MatchPrecision, RecognitionConfig, ScenarioType,
};

/// Body of `POST /api/actions/resolve`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolveActionRequest {
    pub input: String,
    #[serde(default)]
    pub context: SituationalContext,
    #[serde(default)]
    pub player: Option<PlayerSnapshot>,
    /// Falls back to the current recognition settings
    #[serde(default)]
    pub config: Option<RecognitionConfig>,
}

/// Body of `POST /api/actions/classify`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassifyRequest {
    pub input: String,
    #[serde(default)]
    pub context: Option<SituationalContext>,
    #[serde(default)]
    pub precision: Option<MatchPrecision>,
}

/// Body of `POST /api/actions/calculate`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CalculateRequest {
    pub scenario: ScenarioType,
    pub player: PlayerSnapshot,
    /// Overrides the player's own luck
    #[serde(default)]
    pub luck: Option<LuckLevel>,
    #[serde(default)]
    pub factors: Vec<InfluenceFactor>,
    /// Fixed seed for a reproducible draw
    #[serde(default)]
    pub seed: Option<u64>,
}
