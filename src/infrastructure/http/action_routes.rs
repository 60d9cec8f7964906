//! Player action routes - resolve, classify and calculate

use axum::{extract::State, http::StatusCode, Json};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

use crate::application::dto::{CalculateRequest, ClassifyRequest, ResolveActionRequest};
use crate::application::ports::inbound::ResolveActionUseCase;
use crate::domain::services::CalculationError;
use crate::domain::value_objects::{CalculationResult, ClassificationResult, ProcessingResult};
use crate::infrastructure::state::AppState;

/// Resolve a player action through the configured strategy
pub async fn resolve_action(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResolveActionRequest>,
) -> Result<Json<ProcessingResult>, (StatusCode, String)> {
    let config = match req.config {
        Some(config) => config,
        None => state.settings_service.get().await,
    };

    state
        .router
        .resolve_action(&req.input, &req.context, req.player.as_ref(), &config)
        .await
        .map(Json)
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
}

/// Classify text without routing, calculating or narrating
pub async fn classify(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ClassifyRequest>,
) -> Json<ClassificationResult> {
    let precision = match req.precision {
        Some(precision) => precision,
        None => state.settings_service.get().await.text_match_precision,
    };
    Json(
        state
            .classifier
            .classify(&req.input, req.context.as_ref(), precision),
    )
}

/// Run the calculation engine directly
pub async fn calculate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CalculateRequest>,
) -> Result<Json<CalculationResult>, (StatusCode, String)> {
    if !state.classifier.is_calculable(req.scenario) {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            CalculationError::NotCalculable(req.scenario).to_string(),
        ));
    }

    let mut rng = match req.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let luck = req.luck.unwrap_or(req.player.luck);
    let mut factors = req.player.influence_factors.clone();
    factors.extend(req.factors);

    state
        .engine
        .calculate(req.scenario, &req.player, luck, &factors, &mut rng)
        .map(Json)
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
}
