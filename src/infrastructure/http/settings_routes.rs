use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::dto::RecommendationResponse;
use crate::application::services::{ConfigurationRecommender, RecommendationNeeds};
use crate::domain::value_objects::RecognitionConfig;
use crate::infrastructure::state::AppState;

pub async fn get_recognition_settings(State(state): State<Arc<AppState>>) -> Json<RecognitionConfig> {
    Json(state.settings_service.get().await)
}

pub async fn update_recognition_settings(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<RecognitionConfig>,
) -> Json<RecognitionConfig> {
    Json(state.settings_service.update(settings).await)
}

pub async fn reset_recognition_settings(
    State(state): State<Arc<AppState>>,
) -> Json<RecognitionConfig> {
    Json(state.settings_service.reset().await)
}

pub async fn recommend_recognition_settings(
    Json(needs): Json<RecommendationNeeds>,
) -> Json<RecommendationResponse> {
    let config = ConfigurationRecommender::recommend(&needs);
    let explanation = ConfigurationRecommender::explain(&config);
    Json(RecommendationResponse {
        config,
        explanation,
    })
}
