//! Calculation engine - deterministic, luck-biased numeric outcomes
//!
//! Every formula is `base + realm + attribute + luck + random + special`,
//! clamped to the scenario's range, followed by an optional critical shift
//! and a second clamp. The only source of randomness is the RNG passed in.

use rand::Rng;

use super::luck_random::LuckBasedRandom;
use crate::domain::entities::PlayerSnapshot;
use crate::domain::value_objects::realm::MAX_REALM;
use crate::domain::value_objects::{
    weighted_sum, CalculationResult, DifficultyRating, InfluenceFactor, LuckLevel, Modifiers,
    ScenarioType, ValueKind, MIN_SUCCESS_RATE,
};

/// Biased roll at or above which a critical success can trigger
///
/// The roll is shifted by luck before the comparison, so the effective rate
/// is 12% for lucky, 22% for blessed and 32% for heaven-defying players.
pub const CRITICAL_SUCCESS_BAND: f64 = 0.98;
/// Biased roll at or below which a critical failure can trigger
///
/// Mirrors the success band: 12% for unlucky and 22% for cursed players.
pub const CRITICAL_FAILURE_BAND: f64 = 0.02;
/// Success-rate shift of a critical result
pub const CRITICAL_RATE_SHIFT: f64 = 50.0;
pub const CRITICAL_EFFECT_MULTIPLIER: f64 = 2.0;
pub const CRITICAL_EFFECT_DIVISOR: f64 = 2.0;
/// Share of the base value gained or lost per luck tier for effect values
pub const EFFECT_LUCK_RATIO: f64 = 0.15;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalculationError {
    #[error("Scenario {0} is not programmatically calculable")]
    NotCalculable(ScenarioType),
    #[error("Invalid realm {0}, expected 0 to 8")]
    InvalidRealm(u8),
}

/// Static shape of one scenario's formula
#[derive(Debug, Clone, Copy)]
struct Formula {
    kind: ValueKind,
    /// Upper clamp before the critical shift (success rates only)
    ceiling: f64,
    /// Additive points per luck tier (success rates only)
    luck_step: f64,
    /// Half-width of the random term: points for rates, a fraction of base for effects
    random_span: f64,
}

impl Formula {
    fn for_scenario(scenario: ScenarioType) -> Option<Self> {
        let rate = |ceiling, luck_step, random_span| Self {
            kind: ValueKind::SuccessRate,
            ceiling,
            luck_step,
            random_span,
        };
        let effect = |random_span| Self {
            kind: ValueKind::EffectValue,
            ceiling: f64::INFINITY,
            luck_step: 0.0,
            random_span,
        };

        match scenario {
            ScenarioType::Combat => Some(rate(95.0, 8.0, 15.0)),
            ScenarioType::Breakthrough => Some(rate(95.0, 10.0, 10.0)),
            ScenarioType::Alchemy => Some(rate(90.0, 6.0, 15.0)),
            ScenarioType::Crafting => Some(rate(85.0, 6.0, 15.0)),
            ScenarioType::FormationBreaking => Some(rate(80.0, 6.0, 20.0)),
            ScenarioType::Cultivation => Some(effect(0.2)),
            ScenarioType::PillConsumption => Some(effect(0.1)),
            ScenarioType::Social
            | ScenarioType::Exploration
            | ScenarioType::Negotiation
            | ScenarioType::BeastTaming => None,
        }
    }
}

fn base_value(scenario: ScenarioType, realm: u8) -> f64 {
    let realm = f64::from(realm);
    match scenario {
        ScenarioType::Combat => 40.0,
        ScenarioType::Breakthrough => (80.0 - 1.5_f64.powf(realm)).max(10.0),
        ScenarioType::Alchemy => 40.0,
        ScenarioType::Crafting => 45.0,
        ScenarioType::FormationBreaking => 35.0,
        ScenarioType::Cultivation => 60.0 * (1.0 + 0.2 * realm),
        ScenarioType::PillConsumption => 60.0,
        _ => 0.0,
    }
}

fn attribute_term(scenario: ScenarioType, player: &PlayerSnapshot) -> f64 {
    let a = &player.attributes;
    let (attribute, coefficient) = match scenario {
        ScenarioType::Combat => (a.strength, 0.8),
        ScenarioType::Breakthrough => (a.constitution, 0.5),
        ScenarioType::Alchemy => (a.intelligence, 0.8),
        ScenarioType::Crafting => ((a.strength + a.intelligence) / 2.0, 0.9),
        ScenarioType::FormationBreaking => (a.intelligence, 0.7),
        ScenarioType::Cultivation => ((a.intelligence + a.constitution) / 2.0, 1.2),
        ScenarioType::PillConsumption => (a.constitution, 1.2),
        _ => return 0.0,
    };
    (attribute - crate::domain::entities::BASELINE_ATTRIBUTE) * coefficient
}

fn realm_term(scenario: ScenarioType, player: &PlayerSnapshot, base: f64) -> f64 {
    let realm = f64::from(player.realm);
    let stage = player.stage;
    match scenario {
        ScenarioType::Combat => (15.0 * realm + stage.combat_bonus()) * 0.8,
        ScenarioType::Breakthrough => stage.breakthrough_bonus(),
        ScenarioType::Alchemy | ScenarioType::Crafting | ScenarioType::FormationBreaking => {
            3.0 * realm + stage.proficiency_bonus()
        }
        ScenarioType::Cultivation | ScenarioType::PillConsumption => {
            base * (stage.resource_multiplier() - 1.0)
        }
        _ => 0.0,
    }
}

/// Pure numeric engine, one instance shared by every request
#[derive(Debug, Clone, Copy, Default)]
pub struct CalculationEngine;

impl CalculationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Whether a formula exists for this scenario
    pub fn supports(&self, scenario: ScenarioType) -> bool {
        Formula::for_scenario(scenario).is_some()
    }

    pub fn calculate<R: Rng + ?Sized>(
        &self,
        scenario: ScenarioType,
        player: &PlayerSnapshot,
        luck: LuckLevel,
        factors: &[InfluenceFactor],
        rng: &mut R,
    ) -> Result<CalculationResult, CalculationError> {
        let formula =
            Formula::for_scenario(scenario).ok_or(CalculationError::NotCalculable(scenario))?;
        if player.realm > MAX_REALM {
            return Err(CalculationError::InvalidRealm(player.realm));
        }

        let base = base_value(scenario, player.realm);
        let tier = f64::from(luck.value());

        let (luck_term, random_term) = match formula.kind {
            ValueKind::SuccessRate => (
                tier * formula.luck_step,
                LuckBasedRandom::centered(rng, luck, formula.random_span),
            ),
            ValueKind::EffectValue => (
                base * EFFECT_LUCK_RATIO * tier,
                base * LuckBasedRandom::centered(rng, luck, formula.random_span),
            ),
        };

        let mut modifiers = Modifiers {
            luck: luck_term,
            random: random_term,
            realm: realm_term(scenario, player, base),
            attribute: attribute_term(scenario, player),
            special: weighted_sum(factors),
            critical: 0.0,
        };

        let raw = base + modifiers.pre_critical_total();
        let pre_critical = match formula.kind {
            ValueKind::SuccessRate => raw.clamp(MIN_SUCCESS_RATE, formula.ceiling),
            ValueKind::EffectValue => formula.kind.clamp(raw),
        };

        let crit_roll = LuckBasedRandom::sample(rng, luck);
        let critical_success = crit_roll >= CRITICAL_SUCCESS_BAND && luck >= LuckLevel::Lucky;
        let critical_failure = crit_roll <= CRITICAL_FAILURE_BAND && luck <= LuckLevel::Unlucky;

        modifiers.critical = match (formula.kind, critical_success, critical_failure) {
            (ValueKind::SuccessRate, true, _) => CRITICAL_RATE_SHIFT,
            (ValueKind::SuccessRate, _, true) => -CRITICAL_RATE_SHIFT,
            (ValueKind::EffectValue, true, _) => pre_critical * (CRITICAL_EFFECT_MULTIPLIER - 1.0),
            (ValueKind::EffectValue, _, true) => pre_critical / CRITICAL_EFFECT_DIVISOR - pre_critical,
            _ => 0.0,
        };

        let final_value = formula.kind.clamp(pre_critical + modifiers.critical);
        let difficulty = match formula.kind {
            ValueKind::SuccessRate => DifficultyRating::from_success_rate(final_value),
            ValueKind::EffectValue => DifficultyRating::Normal,
        };

        tracing::debug!(
            scenario = %scenario,
            final_value,
            critical_success,
            critical_failure,
            "Calculated outcome"
        );

        Ok(CalculationResult {
            kind: formula.kind,
            base_value: base,
            modifiers,
            final_value,
            critical_success,
            critical_failure,
            difficulty,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Attributes;
    use crate::domain::value_objects::{
        FactorType, Importance, RealmStage, MAX_SUCCESS_RATE,
    };
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const CALCULABLE: [ScenarioType; 7] = [
        ScenarioType::Combat,
        ScenarioType::Breakthrough,
        ScenarioType::Cultivation,
        ScenarioType::Alchemy,
        ScenarioType::Crafting,
        ScenarioType::FormationBreaking,
        ScenarioType::PillConsumption,
    ];

    fn player(realm: u8, stage: RealmStage) -> PlayerSnapshot {
        PlayerSnapshot::new(realm, stage)
    }

    #[test]
    fn test_same_seed_same_result() {
        let engine = CalculationEngine::new();
        let p = player(2, RealmStage::Middle);
        let a = engine
            .calculate(ScenarioType::Combat, &p, LuckLevel::Lucky, &[], &mut StdRng::seed_from_u64(9))
            .unwrap();
        let b = engine
            .calculate(ScenarioType::Combat, &p, LuckLevel::Lucky, &[], &mut StdRng::seed_from_u64(9))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_non_calculable_scenarios_are_rejected() {
        let engine = CalculationEngine::new();
        let mut rng = StdRng::seed_from_u64(1);
        for scenario in [
            ScenarioType::Social,
            ScenarioType::Exploration,
            ScenarioType::Negotiation,
            ScenarioType::BeastTaming,
        ] {
            let err = engine
                .calculate(scenario, &player(1, RealmStage::Early), LuckLevel::Normal, &[], &mut rng)
                .unwrap_err();
            assert_eq!(err, CalculationError::NotCalculable(scenario));
        }
    }

    #[test]
    fn test_invalid_realm() {
        let engine = CalculationEngine::new();
        let err = engine
            .calculate(
                ScenarioType::Combat,
                &player(12, RealmStage::Early),
                LuckLevel::Normal,
                &[],
                &mut StdRng::seed_from_u64(1),
            )
            .unwrap_err();
        assert_eq!(err, CalculationError::InvalidRealm(12));
    }

    #[test]
    fn test_final_value_always_in_range_and_crits_exclusive() {
        let engine = CalculationEngine::new();
        let mut rng = StdRng::seed_from_u64(2024);
        let extreme = Attributes {
            strength: 100.0,
            intelligence: 0.0,
            charm: 50.0,
            constitution: 100.0,
        };
        let factors = vec![InfluenceFactor::new(FactorType::Special, "Heavenly omen", "the sky splits", Importance::Critical)
            .with_numeric_value(40.0)];

        for scenario in CALCULABLE {
            for luck in LuckLevel::ALL {
                for realm in [0, 4, 8] {
                    for stage in RealmStage::ALL {
                        let p = player(realm, stage).with_attributes(extreme);
                        for _ in 0..20 {
                            let r = engine.calculate(scenario, &p, luck, &factors, &mut rng).unwrap();
                            assert!(!(r.critical_success && r.critical_failure));
                            match r.kind {
                                ValueKind::SuccessRate => assert!(
                                    (MIN_SUCCESS_RATE..=MAX_SUCCESS_RATE).contains(&r.final_value),
                                    "{} out of range: {}",
                                    scenario,
                                    r.final_value
                                ),
                                ValueKind::EffectValue => assert!(r.final_value >= 0.0),
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_luck_never_lowers_expected_value() {
        let engine = CalculationEngine::new();
        let p = player(0, RealmStage::Early);
        let trials = 3_000;

        for scenario in [ScenarioType::Combat, ScenarioType::Cultivation, ScenarioType::FormationBreaking] {
            let means: Vec<f64> = LuckLevel::ALL
                .iter()
                .map(|&luck| {
                    let mut rng = StdRng::seed_from_u64(77);
                    let total: f64 = (0..trials)
                        .map(|_| engine.calculate(scenario, &p, luck, &[], &mut rng).unwrap().final_value)
                        .sum();
                    total / trials as f64
                })
                .collect();

            for pair in means.windows(2) {
                assert!(pair[1] >= pair[0], "{}: {:?}", scenario, means);
            }
        }
    }

    #[test]
    fn test_breakthrough_base_decreases_with_realm() {
        let engine = CalculationEngine::new();
        let bases: Vec<f64> = (3..=8)
            .map(|realm| {
                engine
                    .calculate(
                        ScenarioType::Breakthrough,
                        &player(realm, RealmStage::Peak),
                        LuckLevel::Normal,
                        &[],
                        &mut StdRng::seed_from_u64(5),
                    )
                    .unwrap()
                    .base_value
            })
            .collect();
        for pair in bases.windows(2) {
            assert!(pair[1] < pair[0], "{:?}", bases);
        }
    }

    #[test]
    fn test_influence_factors_feed_special_modifier() {
        let engine = CalculationEngine::new();
        let factors = vec![
            InfluenceFactor::new(FactorType::Equipment, "Pill furnace", "steady flame", Importance::Major)
                .with_numeric_value(10.0),
            InfluenceFactor::new(FactorType::Mood, "Calm", "mind is clear", Importance::Minor),
        ];
        let r = engine
            .calculate(
                ScenarioType::Alchemy,
                &player(1, RealmStage::Early),
                LuckLevel::Normal,
                &factors,
                &mut StdRng::seed_from_u64(8),
            )
            .unwrap();
        assert_eq!(r.modifiers.special, 15.0);
        assert_eq!(r.modifiers.realm, 3.0);
    }

    #[test]
    fn test_critical_rates_per_luck_tier() {
        let engine = CalculationEngine::new();
        let p = player(1, RealmStage::Early);
        let trials = 20_000;

        for (luck, expected_success, expected_failure) in [
            (LuckLevel::Cursed, 0.0, 0.22),
            (LuckLevel::Unlucky, 0.0, 0.12),
            (LuckLevel::Normal, 0.0, 0.0),
            (LuckLevel::Lucky, 0.12, 0.0),
            (LuckLevel::Blessed, 0.22, 0.0),
            (LuckLevel::HeavenDefying, 0.32, 0.0),
        ] {
            let mut rng = StdRng::seed_from_u64(314);
            let (mut successes, mut failures) = (0, 0);
            for _ in 0..trials {
                let r = engine.calculate(ScenarioType::Combat, &p, luck, &[], &mut rng).unwrap();
                successes += usize::from(r.critical_success);
                failures += usize::from(r.critical_failure);
            }
            let success_rate = successes as f64 / trials as f64;
            let failure_rate = failures as f64 / trials as f64;
            assert!((success_rate - expected_success).abs() < 0.015, "{}: {}", luck, success_rate);
            assert!((failure_rate - expected_failure).abs() < 0.015, "{}: {}", luck, failure_rate);
        }
    }

    #[test]
    fn test_critical_only_for_matching_luck() {
        let engine = CalculationEngine::new();
        let p = player(1, RealmStage::Early);
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..2_000 {
            let r = engine.calculate(ScenarioType::Combat, &p, LuckLevel::Normal, &[], &mut rng).unwrap();
            assert!(!r.critical_success && !r.critical_failure);
            let r = engine.calculate(ScenarioType::Combat, &p, LuckLevel::Blessed, &[], &mut rng).unwrap();
            assert!(!r.critical_failure);
            let r = engine.calculate(ScenarioType::Combat, &p, LuckLevel::Cursed, &[], &mut rng).unwrap();
            assert!(!r.critical_success);
        }
    }
}
