//! Inbound ports - Interfaces that the application exposes to the outside world

use async_trait::async_trait;

use crate::domain::entities::{PlayerSnapshot, SituationalContext};
use crate::domain::services::CalculationError;
use crate::domain::value_objects::{ProcessingResult, RecognitionConfig};

/// Resolve one free-text player action
///
/// External-service failures never surface here; they show up as a degraded
/// `ProcessingResult`. The only error is an invalid player snapshot.
#[async_trait]
pub trait ResolveActionUseCase: Send + Sync {
    async fn resolve_action(
        &self,
        input: &str,
        context: &SituationalContext,
        player: Option<&PlayerSnapshot>,
        config: &RecognitionConfig,
    ) -> Result<ProcessingResult, CalculationError>;
}
