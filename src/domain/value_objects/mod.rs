//! Value objects - Immutable objects defined by their attributes

mod calculation;
mod classification;
mod influence;
mod luck;
mod processing;
pub mod realm;
mod recognition_config;
mod scenario;

pub use calculation::{
    CalculationResult, DifficultyRating, Modifiers, ValueKind, MAX_SUCCESS_RATE, MIN_SUCCESS_RATE,
};
pub use classification::{ClassificationResult, ClassificationSource, MatchPrecision};
pub use influence::{weighted_sum, FactorType, Importance, InfluenceFactor};
pub use luck::LuckLevel;
pub use processing::{ProcessingMethod, ProcessingResult};
pub use realm::{BreakthroughTier, RealmStage};
pub use recognition_config::{RecognitionConfig, RecognitionMethod, UserPreferences};
pub use scenario::ScenarioType;
