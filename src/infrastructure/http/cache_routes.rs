use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::application::services::CacheStats;
use crate::infrastructure::state::AppState;

pub async fn cache_stats(State(state): State<Arc<AppState>>) -> Json<CacheStats> {
    Json(state.cache.stats().await)
}

pub async fn clear_cache(State(state): State<Arc<AppState>>) -> StatusCode {
    state.cache.clear().await;
    StatusCode::NO_CONTENT
}
