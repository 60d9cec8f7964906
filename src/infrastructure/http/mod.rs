//! HTTP REST API routes

mod action_routes;
mod cache_routes;
mod settings_routes;
mod status_routes;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::infrastructure::state::AppState;

pub use action_routes::*;
pub use cache_routes::*;
pub use settings_routes::*;
pub use status_routes::*;

/// Create all API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Player actions
        .route("/api/actions/resolve", post(action_routes::resolve_action))
        .route("/api/actions/classify", post(action_routes::classify))
        .route("/api/actions/calculate", post(action_routes::calculate))
        // Recognition settings
        .route(
            "/api/settings/recognition",
            get(settings_routes::get_recognition_settings)
                .put(settings_routes::update_recognition_settings),
        )
        .route(
            "/api/settings/recognition/reset",
            post(settings_routes::reset_recognition_settings),
        )
        .route(
            "/api/settings/recognition/recommend",
            post(settings_routes::recommend_recognition_settings),
        )
        // Result cache
        .route("/api/cache/stats", get(cache_routes::cache_stats))
        .route("/api/cache", delete(cache_routes::clear_cache))
        // External backends
        .route("/api/backends/status", get(status_routes::backend_status))
}
