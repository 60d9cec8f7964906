use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::services::BackendStatus;
use crate::infrastructure::state::AppState;

/// Reachability of the assistant and narrator backends
pub async fn backend_status(State(state): State<Arc<AppState>>) -> Json<BackendStatus> {
    Json(state.router.handoff().backend_status().await)
}
