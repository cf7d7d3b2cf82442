//! Hit chance and accuracy calculations.

use crate::config::CombatConfig;
use crate::env::RandomSource;

/// Calculate hit chance from effective accuracy and evasion.
///
/// # Formula
///
/// ```text
/// hit_chance = base * accuracy / evasion
/// clamped to [min, max]
/// ```
///
/// `accuracy` and `evasion` are the stat values already multiplied by any
/// equipment bonus. A non-finite ratio resolves to the lower bound.
pub fn calculate_hit_chance(accuracy: f64, evasion: f64, config: &CombatConfig) -> f64 {
    let chance = config.base_hit_chance * accuracy / evasion;
    if chance.is_nan() {
        return config.min_hit_chance;
    }
    chance.clamp(config.min_hit_chance, config.max_hit_chance)
}

/// Effective accuracy or evasion after a fractional equipment bonus.
pub fn with_bonus(stat: f64, bonus: f64) -> f64 {
    (stat * (1.0 + bonus)).max(0.0)
}

/// One Bernoulli trial against the computed hit chance.
pub fn check_hit(
    accuracy: f64,
    evasion: f64,
    config: &CombatConfig,
    rng: &mut dyn RandomSource,
) -> bool {
    rng.chance(calculate_hit_chance(accuracy, evasion, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::FixedRandom;

    #[test]
    fn neutral_stats_give_base_chance() {
        let config = CombatConfig::default();
        assert!((calculate_hit_chance(1.0, 1.0, &config) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn chance_is_clamped() {
        let config = CombatConfig::default();
        assert_eq!(calculate_hit_chance(100.0, 0.1, &config), 0.99);
        assert_eq!(calculate_hit_chance(0.1, 100.0, &config), 0.05);
        assert_eq!(calculate_hit_chance(0.0, 0.0, &config), 0.05);
        assert_eq!(calculate_hit_chance(1.0, 0.0, &config), 0.99);
    }

    #[test]
    fn check_hit_uses_one_roll() {
        let config = CombatConfig::default();
        assert!(check_hit(1.0, 1.0, &config, &mut FixedRandom(0.89)));
        assert!(!check_hit(1.0, 1.0, &config, &mut FixedRandom(0.9)));
    }
}
