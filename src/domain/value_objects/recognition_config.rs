//! Recognition configuration value object
//!
//! Chosen by the host per call. Serialized over the REST API, so unknown
//! method or precision strings are tolerated and mapped to safe defaults
//! instead of rejecting the whole payload.

use serde::{Deserialize, Serialize};

use super::MatchPrecision;

/// Which processing strategy the router follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum RecognitionMethod {
    TextOnly,
    TextPrimary,
    AiPrimary,
    #[default]
    Hybrid,
}

impl RecognitionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextOnly => "text_only",
            Self::TextPrimary => "text_primary",
            Self::AiPrimary => "ai_primary",
            Self::Hybrid => "hybrid",
        }
    }

    /// Unknown values fall back to hybrid
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().replace('-', "_").as_str() {
            "text_only" => Self::TextOnly,
            "text_primary" => Self::TextPrimary,
            "ai_primary" => Self::AiPrimary,
            "hybrid" => Self::Hybrid,
            other => {
                tracing::warn!("Unknown recognition method '{}', using hybrid", other);
                Self::Hybrid
            }
        }
    }
}

impl From<String> for RecognitionMethod {
    fn from(value: String) -> Self {
        Self::parse_lenient(&value)
    }
}

impl std::str::FromStr for RecognitionMethod {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

impl std::fmt::Display for RecognitionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Soft preferences recorded alongside the config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub prefer_speed: bool,
    pub prefer_cost: bool,
    pub prefer_accuracy: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            prefer_speed: true,
            prefer_cost: false,
            prefer_accuracy: false,
        }
    }
}

/// Per-call recognition settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    pub method: RecognitionMethod,
    pub text_match_precision: MatchPrecision,
    pub enable_programmatic_calculation: bool,
    pub ai_backup_enabled: bool,
    pub cache_results: bool,
    pub preferences: UserPreferences,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            method: RecognitionMethod::Hybrid,
            text_match_precision: MatchPrecision::Moderate,
            enable_programmatic_calculation: true,
            ai_backup_enabled: true,
            cache_results: true,
            preferences: UserPreferences::default(),
        }
    }
}

impl RecognitionConfig {
    /// Load from environment variables, using defaults for missing values
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            method: env_or("ENGINE_RECOGNITION_METHOD", defaults.method),
            text_match_precision: env_or("ENGINE_TEXT_MATCH_PRECISION", defaults.text_match_precision),
            enable_programmatic_calculation: env_or("ENGINE_ENABLE_CALCULATION", defaults.enable_programmatic_calculation),
            ai_backup_enabled: env_or("ENGINE_AI_BACKUP", defaults.ai_backup_enabled),
            cache_results: env_or("ENGINE_CACHE_RESULTS", defaults.cache_results),
            preferences: defaults.preferences,
        }
    }

    pub fn with_method(mut self, method: RecognitionMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_precision(mut self, precision: MatchPrecision) -> Self {
        self.text_match_precision = precision;
        self
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}
