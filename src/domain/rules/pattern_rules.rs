//! Compiled rule set

use std::collections::HashSet;

use regex::Regex;

use super::{ContextRequirements, MatchRuleDef, RuleSetError};
use crate::domain::value_objects::ScenarioType;

/// A rule with lowercased literal patterns and compiled regexes
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub scenario: ScenarioType,
    pub exact: Vec<String>,
    pub prefix: Vec<String>,
    pub suffix: Vec<String>,
    pub contains: Vec<String>,
    pub regex: Vec<Regex>,
    pub context: ContextRequirements,
    pub base_confidence: f64,
    pub programmatic_calculable: bool,
}

impl CompiledRule {
    fn compile(def: MatchRuleDef) -> Result<Self, RuleSetError> {
        if def.patterns.is_empty() {
            return Err(RuleSetError::EmptyRule(def.scenario));
        }
        if !(def.base_confidence > 0.0 && def.base_confidence <= 1.0) {
            return Err(RuleSetError::InvalidConfidence {
                scenario: def.scenario,
                value: def.base_confidence,
            });
        }

        let regex = def
            .patterns
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| RuleSetError::InvalidRegex {
                    scenario: def.scenario,
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            scenario: def.scenario,
            exact: lowercase_all(def.patterns.exact),
            prefix: lowercase_all(def.patterns.prefix),
            suffix: lowercase_all(def.patterns.suffix),
            contains: lowercase_all(def.patterns.contains),
            regex,
            context: def.context_requirements,
            base_confidence: def.base_confidence,
            programmatic_calculable: def.programmatic_calculable,
        })
    }
}

fn lowercase_all(patterns: Vec<String>) -> Vec<String> {
    patterns
        .into_iter()
        .map(|p| p.to_lowercase())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Immutable, validated set of rules in declaration order
///
/// Order matters: when two rules score the same, the earlier one wins.
#[derive(Debug, Clone)]
pub struct PatternRuleSet {
    rules: Vec<CompiledRule>,
}

impl PatternRuleSet {
    pub fn compile(defs: Vec<MatchRuleDef>) -> Result<Self, RuleSetError> {
        if defs.is_empty() {
            return Err(RuleSetError::EmptyRuleSet);
        }

        let mut seen = HashSet::new();
        let mut rules = Vec::with_capacity(defs.len());
        for def in defs {
            if !seen.insert(def.scenario) {
                return Err(RuleSetError::DuplicateScenario(def.scenario));
            }
            rules.push(CompiledRule::compile(def)?);
        }

        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn get(&self, scenario: ScenarioType) -> Option<&CompiledRule> {
        self.rules.iter().find(|rule| rule.scenario == scenario)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn programmatic_scenarios(&self) -> Vec<ScenarioType> {
        self.rules
            .iter()
            .filter(|rule| rule.programmatic_calculable)
            .map(|rule| rule.scenario)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rules::PatternLists;

    fn def(scenario: ScenarioType, regex: &str) -> MatchRuleDef {
        MatchRuleDef {
            scenario,
            patterns: PatternLists {
                exact: vec!["Attack".to_string()],
                regex: vec![regex.to_string()],
                ..Default::default()
            },
            context_requirements: ContextRequirements::default(),
            base_confidence: 0.9,
            programmatic_calculable: true,
        }
    }

    #[test]
    fn test_compile_lowercases_literals() {
        let set = PatternRuleSet::compile(vec![def(ScenarioType::Combat, "^attack")]).unwrap();
        assert_eq!(set.rules()[0].exact, vec!["attack".to_string()]);
        assert_eq!(set.programmatic_scenarios(), vec![ScenarioType::Combat]);
    }

    #[test]
    fn test_rejects_invalid_regex() {
        let err = PatternRuleSet::compile(vec![def(ScenarioType::Combat, "(unclosed")]).unwrap_err();
        assert!(matches!(err, RuleSetError::InvalidRegex { .. }));
    }

    #[test]
    fn test_rejects_duplicates_and_empty_sets() {
        let err = PatternRuleSet::compile(vec![
            def(ScenarioType::Combat, "a"),
            def(ScenarioType::Combat, "b"),
        ])
        .unwrap_err();
        assert!(matches!(err, RuleSetError::DuplicateScenario(ScenarioType::Combat)));

        assert!(matches!(
            PatternRuleSet::compile(Vec::new()),
            Err(RuleSetError::EmptyRuleSet)
        ));
    }

    #[test]
    fn test_rejects_out_of_range_confidence() {
        let mut bad = def(ScenarioType::Social, "x");
        bad.base_confidence = 1.4;
        assert!(matches!(
            PatternRuleSet::compile(vec![bad]),
            Err(RuleSetError::InvalidConfidence { .. })
        ));
    }
}
