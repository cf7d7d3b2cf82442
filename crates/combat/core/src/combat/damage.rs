//! Damage calculation and application.

use crate::combat::advantage::type_multiplier;
use crate::config::CombatConfig;
use crate::env::RandomSource;
use crate::error::{CombatError, ErrorSeverity};
use crate::state::{CreatureType, Resistances, Stats};

/// Errors raised while computing a single attack.
///
/// The orchestrator never propagates these: the attack degrades to
/// `min_damage` and the battle continues.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum AttackError {
    /// A damage stage produced NaN or infinity.
    #[error("non-finite damage {value} after {stage}")]
    NonFiniteDamage { stage: &'static str, value: f64 },

    /// A catalog multiplier is unusable.
    #[error("invalid multiplier {value} from {source_name}")]
    InvalidMultiplier { source_name: String, value: f64 },
}

impl CombatError for AttackError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NonFiniteDamage { .. } => ErrorSeverity::Internal,
            Self::InvalidMultiplier { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NonFiniteDamage { .. } => "ATTACK_NON_FINITE_DAMAGE",
            Self::InvalidMultiplier { .. } => "ATTACK_INVALID_MULTIPLIER",
        }
    }
}

/// Everything the damage formula reads for one hit.
#[derive(Clone, Copy, Debug)]
pub struct DamageInput<'a> {
    pub attacker: &'a Stats,
    pub attacker_type: CreatureType,
    pub defender: &'a Stats,
    pub defender_type: CreatureType,
    pub defender_resistances: &'a Resistances,
    /// Fractional bonus from the attacker's equipment damage channels.
    pub damage_bonus: f64,
    pub is_critical: bool,
}

/// `floor(max(1, atk - def / 2))`
pub fn base_damage(atk: f64, def: f64) -> f64 {
    (atk - def / 2.0).max(1.0).floor()
}

/// Crit chance from luck plus any equipment bonus, capped.
pub fn calculate_crit_chance(luck: f64, crit_bonus: f64, config: &CombatConfig) -> f64 {
    let chance = luck * config.crit_per_luck + crit_bonus;
    if chance.is_nan() {
        return 0.0;
    }
    chance.clamp(0.0, config.crit_cap)
}

pub fn check_crit(
    luck: f64,
    crit_bonus: f64,
    config: &CombatConfig,
    rng: &mut dyn RandomSource,
) -> bool {
    rng.chance(calculate_crit_chance(luck, crit_bonus, config))
}

/// `max(floor, 1 - (fire + ice + storm) / 100)`
pub fn resistance_multiplier(resistances: &Resistances, config: &CombatConfig) -> f64 {
    let multiplier = 1.0 - resistances.elemental_total() / 100.0;
    if multiplier.is_nan() {
        return 1.0;
    }
    multiplier.max(config.resistance_floor)
}

/// Calculate damage for one landed hit.
///
/// # Formula
///
/// ```text
/// damage = floor(max(1, atk - def / 2)) * type_multiplier
/// if critical:           damage *= crit_multiplier
/// if attacker elemental: damage *= max(0.1, 1 - elemental_resistance / 100)
/// damage *= 1 + equipment_damage_bonus
/// final = max(min_damage, floor(damage))
/// ```
///
/// # Errors
///
/// Returns `AttackError::NonFiniteDamage` when a stage overflows to a
/// non-finite value.
pub fn calculate_damage(input: &DamageInput<'_>, config: &CombatConfig) -> Result<u32, AttackError> {
    let mut damage = base_damage(input.attacker.atk, input.defender.def);
    damage *= type_multiplier(input.attacker_type, input.defender_type, config);

    if input.is_critical {
        damage *= config.crit_multiplier;
    }

    if input.attacker_type == CreatureType::Elemental {
        damage *= resistance_multiplier(input.defender_resistances, config);
    }

    damage *= (1.0 + input.damage_bonus).max(0.0);
    finite_damage(damage, "damage formula", config)
}

/// Converts a raw damage value into whole damage, rejecting non-finite input.
///
/// # Errors
///
/// Returns `AttackError::NonFiniteDamage` for NaN or infinite values.
pub fn finite_damage(
    value: f64,
    stage: &'static str,
    config: &CombatConfig,
) -> Result<u32, AttackError> {
    if !value.is_finite() {
        return Err(AttackError::NonFiniteDamage { stage, value });
    }
    let floored = value.floor().clamp(0.0, f64::from(u32::MAX)) as u32;
    Ok(floored.max(config.min_damage))
}
