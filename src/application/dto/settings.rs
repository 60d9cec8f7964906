use serde::{Deserialize, Serialize};

use crate::domain::value_objects::RecognitionConfig;

/// Response of `POST /api/settings/recognition/recommend`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub config: RecognitionConfig,
    pub explanation: String,
}
