//! Scenario classifier - multi-tier text matching against a pattern rule set

use crate::domain::entities::SituationalContext;
use crate::domain::rules::{CompiledRule, PatternRuleSet, RuleSetError, RuleSetLoader};
use crate::domain::value_objects::{
    ClassificationResult, ClassificationSource, MatchPrecision, ScenarioType,
};

pub const EXACT_WEIGHT: f64 = 30.0;
pub const PREFIX_WEIGHT: f64 = 25.0;
pub const SUFFIX_WEIGHT: f64 = 25.0;
pub const CONTAINS_WEIGHT: f64 = 20.0;
pub const REGEX_WEIGHT: f64 = 35.0;
pub const LOCATION_BONUS: f64 = 10.0;
pub const OBJECT_BONUS: f64 = 15.0;
pub const PLAYER_STATE_BONUS: f64 = 12.0;
/// Raw score that maps to full confidence
pub const CONFIDENCE_CEILING: f64 = 100.0;

pub const HOSTILE_CONFIDENCE: f64 = 0.5;
pub const DIALOGUE_CONFIDENCE: f64 = 0.4;
pub const DEFAULT_CONFIDENCE: f64 = 0.3;

const HOSTILE_TAGS: [&str; 7] = ["敌人", "怪物", "对手", "enemy", "monster", "opponent", "foe"];
const DIALOGUE_MARKERS: [&str; 4] = ["说", "问", "告诉", "询问"];
const DIALOGUE_WORDS: [&str; 11] = [
    "say", "says", "ask", "asks", "tell", "tells", "talk", "talks", "speak", "speaks", "inquire",
];

/// Weighted score of a single rule against one input
#[derive(Debug, Clone, PartialEq)]
pub struct RuleScore {
    pub scenario: ScenarioType,
    pub score: f64,
    pub programmatic_calculable: bool,
    pub reasoning: Vec<String>,
}

/// Pure classifier over an immutable rule set
#[derive(Debug, Clone)]
pub struct ScenarioClassifier {
    rules: PatternRuleSet,
}

impl ScenarioClassifier {
    pub fn new(rules: PatternRuleSet) -> Self {
        Self { rules }
    }

    pub fn from_loader(loader: &dyn RuleSetLoader) -> Result<Self, RuleSetError> {
        Ok(Self::new(loader.load()?))
    }

    pub fn rules(&self) -> &PatternRuleSet {
        &self.rules
    }

    /// Calculable flag of the scenario's rule; scenarios without a rule are not
    pub fn is_calculable(&self, scenario: ScenarioType) -> bool {
        self.rules
            .get(scenario)
            .map(|rule| rule.programmatic_calculable)
            .unwrap_or(false)
    }

    /// Score every rule, best first; rules scoring zero are omitted
    ///
    /// Ties keep rule-set order.
    pub fn score_rules(
        &self,
        input: &str,
        context: Option<&SituationalContext>,
        precision: MatchPrecision,
    ) -> Vec<RuleScore> {
        let mut scores: Vec<RuleScore> = self
            .rules
            .rules()
            .iter()
            .map(|rule| score_rule(rule, input, context, precision))
            .filter(|s| s.score > 0.0)
            .collect();
        scores.sort_by(|a, b| b.score.total_cmp(&a.score));
        scores
    }

    pub fn classify(
        &self,
        input: &str,
        context: Option<&SituationalContext>,
        precision: MatchPrecision,
    ) -> ClassificationResult {
        let threshold = precision.threshold();
        let best = self.score_rules(input, context, precision).into_iter().next();

        let result = match best {
            Some(best) if best.score >= threshold => {
                let mut reasoning = best.reasoning;
                reasoning.push(format!(
                    "score {:.1} meets the {} threshold of {}",
                    best.score,
                    precision.as_str(),
                    threshold
                ));
                ClassificationResult {
                    scenario_type: best.scenario,
                    confidence: (best.score / CONFIDENCE_CEILING).min(1.0),
                    score: best.score,
                    source: ClassificationSource::RuleMatch,
                    programmatic_calculable: best.programmatic_calculable,
                    reasoning,
                    matched_rule: Some(best.scenario),
                }
            }
            best => {
                let mut result = self.heuristic(input, context);
                if let Some(best) = best {
                    result.reasoning.insert(
                        0,
                        format!(
                            "best rule {} scored {:.1}, below the {} threshold of {}",
                            best.scenario,
                            best.score,
                            precision.as_str(),
                            threshold
                        ),
                    );
                }
                result
            }
        };

        tracing::debug!(
            scenario = %result.scenario_type,
            confidence = result.confidence,
            score = result.score,
            source = ?result.source,
            "Classified input"
        );
        result
    }

    /// Candidate scenarios for an unclear input, best first
    pub fn suggest_alternatives(
        &self,
        input: &str,
        context: Option<&SituationalContext>,
    ) -> Vec<ScenarioType> {
        let mut suggestions: Vec<ScenarioType> = self
            .score_rules(input, context, MatchPrecision::Loose)
            .into_iter()
            .map(|s| s.scenario)
            .take(3)
            .collect();

        if suggestions.is_empty() {
            suggestions = vec![ScenarioType::Exploration, ScenarioType::Social];
        }
        suggestions
    }

    fn heuristic(&self, input: &str, context: Option<&SituationalContext>) -> ClassificationResult {
        let hostile = context.and_then(|ctx| HOSTILE_TAGS.iter().find(|tag| ctx.has_object(tag)));
        if let Some(tag) = hostile {
            return ClassificationResult::heuristic(
                ScenarioType::Combat,
                HOSTILE_CONFIDENCE,
                self.is_calculable(ScenarioType::Combat),
                format!("hostile presence nearby ({})", tag),
            );
        }

        if let Some(verb) = dialogue_verb(input) {
            return ClassificationResult::heuristic(
                ScenarioType::Social,
                DIALOGUE_CONFIDENCE,
                self.is_calculable(ScenarioType::Social),
                format!("dialogue verb '{}'", verb),
            );
        }

        ClassificationResult::heuristic(
            ScenarioType::Exploration,
            DEFAULT_CONFIDENCE,
            self.is_calculable(ScenarioType::Exploration),
            "no rule matched, defaulting to exploration",
        )
    }
}

fn dialogue_verb(input: &str) -> Option<&'static str> {
    if let Some(marker) = DIALOGUE_MARKERS.iter().find(|m| input.contains(*m)) {
        return Some(*marker);
    }
    let lower = input.to_lowercase();
    lower
        .split(|c: char| !c.is_alphanumeric())
        .find_map(|word| DIALOGUE_WORDS.iter().find(|w| **w == word).copied())
}

fn score_rule(
    rule: &CompiledRule,
    input: &str,
    context: Option<&SituationalContext>,
    precision: MatchPrecision,
) -> RuleScore {
    let lower = input.trim().to_lowercase();
    let mut score = 0.0;
    let mut reasoning = Vec::new();

    let mut tier = |label: &str, weight: f64, hits: Vec<&str>| {
        if !hits.is_empty() {
            score += weight * hits.len() as f64;
            reasoning.push(format!("{} match: {}", label, hits.join(", ")));
        }
    };

    tier(
        "exact",
        EXACT_WEIGHT,
        rule.exact
            .iter()
            .filter(|p| lower == **p || lower.contains(p.as_str()))
            .map(String::as_str)
            .collect(),
    );
    tier(
        "prefix",
        PREFIX_WEIGHT,
        rule.prefix
            .iter()
            .filter(|p| lower.starts_with(p.as_str()))
            .map(String::as_str)
            .collect(),
    );
    tier(
        "suffix",
        SUFFIX_WEIGHT,
        rule.suffix
            .iter()
            .filter(|p| lower.ends_with(p.as_str()))
            .map(String::as_str)
            .collect(),
    );
    tier(
        "contains",
        CONTAINS_WEIGHT,
        rule.contains
            .iter()
            .filter(|p| lower.contains(p.as_str()))
            .map(String::as_str)
            .collect(),
    );
    tier(
        "pattern",
        REGEX_WEIGHT,
        rule.regex
            .iter()
            .filter(|re| re.is_match(input))
            .map(|re| re.as_str())
            .collect(),
    );

    if let Some(ctx) = context {
        let req = &rule.context;
        tier(
            "location",
            LOCATION_BONUS,
            req.location
                .iter()
                .filter(|tag| ctx.location_contains(tag))
                .map(String::as_str)
                .collect(),
        );
        tier(
            "object",
            OBJECT_BONUS,
            req.objects
                .iter()
                .filter(|tag| ctx.has_object(tag))
                .map(String::as_str)
                .collect(),
        );
        tier(
            "player state",
            PLAYER_STATE_BONUS,
            req.player_state
                .iter()
                .filter(|tag| ctx.player_state_contains(tag))
                .map(String::as_str)
                .collect(),
        );
    }

    RuleScore {
        scenario: rule.scenario,
        score: score * precision.multiplier() * rule.base_confidence,
        programmatic_calculable: rule.programmatic_calculable,
        reasoning,
    }
}
