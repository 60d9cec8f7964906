//! Luck level - signed bias applied to random draws and additive modifiers

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Fortune tier of a character for a single action
///
/// The numeric value (`-2..=3`) is what the calculation engine multiplies by;
/// the variant order is therefore meaningful and `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LuckLevel {
    Cursed,
    Unlucky,
    Normal,
    Lucky,
    Blessed,
    HeavenDefying,
}

impl Default for LuckLevel {
    fn default() -> Self {
        Self::Normal
    }
}

impl LuckLevel {
    pub const ALL: [LuckLevel; 6] = [
        Self::Cursed,
        Self::Unlucky,
        Self::Normal,
        Self::Lucky,
        Self::Blessed,
        Self::HeavenDefying,
    ];

    pub fn value(&self) -> i8 {
        match self {
            Self::Cursed => -2,
            Self::Unlucky => -1,
            Self::Normal => 0,
            Self::Lucky => 1,
            Self::Blessed => 2,
            Self::HeavenDefying => 3,
        }
    }

    pub fn from_value(value: i8) -> Option<Self> {
        Self::ALL.into_iter().find(|luck| luck.value() == value)
    }

    /// Flavour label forwarded to the narrator
    pub fn description(&self) -> &'static str {
        match self {
            Self::Cursed => "诅咒缠身 (cursed)",
            Self::Unlucky => "时运不济 (down on their luck)",
            Self::Normal => "平平无奇 (ordinary fortune)",
            Self::Lucky => "福星高照 (lucky star overhead)",
            Self::Blessed => "鸿运当头 (blessed by fortune)",
            Self::HeavenDefying => "逆天改命 (heaven-defying fortune)",
        }
    }

    /// Draw a luck tier with the game's standard distribution
    ///
    /// heaven-defying 1%, cursed 4%, blessed 10%, lucky 20%, unlucky 30%, normal 35%.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let roll: f64 = rng.gen();
        if roll < 0.01 {
            Self::HeavenDefying
        } else if roll < 0.05 {
            Self::Cursed
        } else if roll < 0.15 {
            Self::Blessed
        } else if roll < 0.35 {
            Self::Lucky
        } else if roll < 0.65 {
            Self::Unlucky
        } else {
            Self::Normal
        }
    }
}

impl std::fmt::Display for LuckLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_value_round_trips() {
        for luck in LuckLevel::ALL {
            assert_eq!(LuckLevel::from_value(luck.value()), Some(luck));
        }
        assert_eq!(LuckLevel::from_value(4), None);
    }

    #[test]
    fn test_ordering_follows_value() {
        assert!(LuckLevel::Cursed < LuckLevel::Unlucky);
        assert!(LuckLevel::Lucky < LuckLevel::HeavenDefying);
    }

    #[test]
    fn test_random_distribution_is_roughly_standard() {
        let mut rng = StdRng::seed_from_u64(7);
        let trials = 20_000;
        let normal = (0..trials)
            .filter(|_| LuckLevel::random(&mut rng) == LuckLevel::Normal)
            .count();
        let share = normal as f64 / trials as f64;
        assert!((0.32..0.38).contains(&share), "normal share was {}", share);
    }
}
