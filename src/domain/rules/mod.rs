//! Pattern rule sets - the data the scenario classifier scores against
//!
//! Rules are plain data (`MatchRuleDef`), compiled once into a
//! `PatternRuleSet` and never mutated afterwards. Where they come from is
//! hidden behind `RuleSetLoader`, so a locale or a game can ship its own table.

mod builtin;
mod loader;
mod pattern_rules;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ScenarioType;

pub use builtin::builtin_rules;
pub use loader::{BuiltinRuleSet, JsonRuleSetLoader, RuleSetLoader};
pub use pattern_rules::{CompiledRule, PatternRuleSet};

/// The five ordered pattern lists of a rule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternLists {
    pub exact: Vec<String>,
    pub prefix: Vec<String>,
    pub suffix: Vec<String>,
    pub contains: Vec<String>,
    /// Regular expressions, matched against the original (not lowercased) input
    pub regex: Vec<String>,
}

impl PatternLists {
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
            && self.prefix.is_empty()
            && self.suffix.is_empty()
            && self.contains.is_empty()
            && self.regex.is_empty()
    }
}

/// Situational tags that add a bonus when present
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextRequirements {
    pub location: Vec<String>,
    pub objects: Vec<String>,
    pub player_state: Vec<String>,
}

/// One scenario definition as stored on disk or in the built-in table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRuleDef {
    pub scenario: ScenarioType,
    pub patterns: PatternLists,
    #[serde(default)]
    pub context_requirements: ContextRequirements,
    pub base_confidence: f64,
    pub programmatic_calculable: bool,
}

/// Why a rule set could not be built
#[derive(Debug, thiserror::Error)]
pub enum RuleSetError {
    #[error("Invalid regex '{pattern}' for scenario {scenario}: {source}")]
    InvalidRegex {
        scenario: ScenarioType,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Duplicate rule for scenario {0}")]
    DuplicateScenario(ScenarioType),
    #[error("Rule for scenario {0} has no patterns")]
    EmptyRule(ScenarioType),
    #[error("Base confidence {value} for scenario {scenario} is outside (0, 1]")]
    InvalidConfidence { scenario: ScenarioType, value: f64 },
    #[error("Rule set is empty")]
    EmptyRuleSet,
    #[error("Failed to read rule file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed rule file: {0}")]
    Parse(#[from] serde_json::Error),
}
