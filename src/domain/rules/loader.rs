//! Rule set loaders

use std::path::{Path, PathBuf};

use super::{builtin_rules, MatchRuleDef, PatternRuleSet, RuleSetError};

/// Source of a compiled rule set
pub trait RuleSetLoader: Send + Sync {
    fn load(&self) -> Result<PatternRuleSet, RuleSetError>;
}

/// The bundled bilingual table
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinRuleSet;

impl RuleSetLoader for BuiltinRuleSet {
    fn load(&self) -> Result<PatternRuleSet, RuleSetError> {
        PatternRuleSet::compile(builtin_rules())
    }
}

/// Reads a JSON array of `MatchRuleDef` from disk
#[derive(Debug, Clone)]
pub struct JsonRuleSetLoader {
    path: PathBuf,
}

impl JsonRuleSetLoader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Parse and compile rule definitions from a JSON string
    pub fn parse(json: &str) -> Result<PatternRuleSet, RuleSetError> {
        let defs: Vec<MatchRuleDef> = serde_json::from_str(json)?;
        PatternRuleSet::compile(defs)
    }
}

impl RuleSetLoader for JsonRuleSetLoader {
    fn load(&self) -> Result<PatternRuleSet, RuleSetError> {
        let json = std::fs::read_to_string(&self.path)?;
        let rules = Self::parse(&json)?;
        tracing::info!(
            "Loaded {} scenario rules from {}",
            rules.len(),
            self.path.display()
        );
        Ok(rules)
    }
}
