//! Speed-based acting order.

use crate::config::CombatConfig;
use crate::env::RandomSource;
use crate::state::{Side, StatusEffects, StatusKind};

/// Speed used for ordering: halved while slowed.
pub fn effective_speed(spd: f64, effects: &StatusEffects, config: &CombatConfig) -> f64 {
    if effects.has(StatusKind::Slow) {
        spd * config.slow_speed_factor
    } else {
        spd
    }
}

/// Returns which side acts first this round.
///
/// Higher effective speed goes first. An exact tie is a coin flip; no draw
/// is consumed otherwise.
pub fn first_actor(
    challenger_speed: f64,
    opponent_speed: f64,
    rng: &mut dyn RandomSource,
) -> Side {
    if challenger_speed > opponent_speed {
        Side::Challenger
    } else if opponent_speed > challenger_speed {
        Side::Opponent
    } else if rng.coin_flip() {
        Side::Challenger
    } else {
        Side::Opponent
    }
}
