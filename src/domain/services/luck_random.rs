//! Luck-biased random sampling

use rand::Rng;

use crate::domain::value_objects::LuckLevel;

/// Shift of the uniform sample per luck tier
pub const LUCK_STEP: f64 = 0.1;
/// Upper bound a heaven-defying outlier may reach
pub const OVERFLOW_CEILING: f64 = 1.2;
/// Lower bound a cursed outlier may reach
pub const UNDERFLOW_FLOOR: f64 = -0.2;
/// Success-chance bonus per luck tier in percentage checks
pub const CHECK_BONUS_PER_TIER: f64 = 5.0;

const OVERFLOW_TRIGGER: f64 = 0.95;
const UNDERFLOW_TRIGGER: f64 = 0.05;

/// Luck-biased sampler
///
/// Holds no state; the RNG is always passed in so callers decide between a
/// seeded generator (tests, replays) and an entropy-seeded one.
pub struct LuckBasedRandom;

impl LuckBasedRandom {
    /// Bias a uniform `[0, 1)` draw by luck
    ///
    /// Normally clamped to `[0, 1]`. The top tier may overflow up to 1.2 on
    /// a very high draw and the bottom tier may dip to -0.2 on a very low one.
    pub fn bias(uniform: f64, luck: LuckLevel) -> f64 {
        let shifted = uniform + f64::from(luck.value()) * LUCK_STEP;

        if luck == LuckLevel::HeavenDefying && uniform > OVERFLOW_TRIGGER {
            return shifted.min(OVERFLOW_CEILING);
        }
        if luck == LuckLevel::Cursed && uniform < UNDERFLOW_TRIGGER {
            return shifted.max(UNDERFLOW_FLOOR);
        }

        shifted.clamp(0.0, 1.0)
    }

    pub fn sample<R: Rng + ?Sized>(rng: &mut R, luck: LuckLevel) -> f64 {
        Self::bias(rng.gen::<f64>(), luck)
    }

    /// Biased draw mapped onto `[-span, +span]` (wider for outliers)
    pub fn centered<R: Rng + ?Sized>(rng: &mut R, luck: LuckLevel, span: f64) -> f64 {
        (Self::sample(rng, luck) - 0.5) * 2.0 * span
    }

    /// Roll against `chance` percent; each luck tier adds five points
    pub fn percentage_check<R: Rng + ?Sized>(rng: &mut R, chance: f64, luck: LuckLevel) -> bool {
        let roll = Self::sample(rng, luck) * 100.0;
        roll <= chance + f64::from(luck.value()) * CHECK_BONUS_PER_TIER
    }
}
