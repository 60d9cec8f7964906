//! Domain services - Pure business logic with no I/O

mod calculation_engine;
mod luck_random;
mod scenario_classifier;

pub use calculation_engine::{CalculationEngine, CalculationError};
pub use luck_random::LuckBasedRandom;
pub use scenario_classifier::{RuleScore, ScenarioClassifier};
