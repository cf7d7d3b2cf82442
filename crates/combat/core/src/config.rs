use crate::error::{CombatError, ErrorSeverity};
use crate::state::StatusKind;

/// How equipment-granted dodge/crit/accuracy bonuses combine when more than
/// one equipped item grants the same bonus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EquipmentBonusStacking {
    /// The last equipped slot that grants the bonus wins.
    #[default]
    Overwrite,
    /// Bonuses from every slot are summed.
    Sum,
}

/// Who is reported as the winner when a battle hits the turn limit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DrawPolicy {
    /// The first-listed combatant is the nominal winner (reward granting
    /// treats the draw as a win for the challenger).
    #[default]
    FirstCombatantWins,
    /// Nobody wins: `winner` and `loser` are `None`, `player_won` is false.
    NoWinner,
}

/// Combat configuration constants and tunable parameters.
///
/// Numeric balance values are treated as given configuration. The defaults
/// reproduce the live game's tuning.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Rounds before the battle is declared a draw.
    pub max_turns: u32,
    /// Damage dealt when an attack computation fails.
    pub min_damage: u32,

    pub base_hit_chance: f64,
    pub min_hit_chance: f64,
    pub max_hit_chance: f64,

    pub crit_per_luck: f64,
    pub crit_cap: f64,
    pub crit_multiplier: f64,

    pub strong_multiplier: f64,
    pub weak_multiplier: f64,

    /// Lower bound of the elemental resistance multiplier.
    pub resistance_floor: f64,

    /// HP fraction restored by an equipment `revive_once`.
    pub equipment_revive_fraction: f64,
    /// HP fraction restored by a skill revive.
    pub skill_revive_fraction: f64,
    /// HP left after a successful death-resistance roll.
    pub death_resistance_hp: u32,

    /// Speed factor applied while slowed (turn order only).
    pub slow_speed_factor: f64,

    pub equipment_bonus_stacking: EquipmentBonusStacking,
    pub draw_policy: DrawPolicy,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// One slot per status kind; a list never holds two instances of a kind.
    pub const MAX_STATUS_EFFECTS: usize = <StatusKind as strum::EnumCount>::COUNT;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_TURNS: u32 = 50;
    pub const DEFAULT_MIN_DAMAGE: u32 = 1;

    pub fn new() -> Self {
        Self {
            max_turns: Self::DEFAULT_MAX_TURNS,
            min_damage: Self::DEFAULT_MIN_DAMAGE,
            base_hit_chance: 0.9,
            min_hit_chance: 0.05,
            max_hit_chance: 0.99,
            crit_per_luck: 0.01,
            crit_cap: 0.3,
            crit_multiplier: 1.5,
            strong_multiplier: 1.5,
            weak_multiplier: 0.75,
            resistance_floor: 0.1,
            equipment_revive_fraction: 0.5,
            skill_revive_fraction: 0.3,
            death_resistance_hp: 1,
            slow_speed_factor: 0.5,
            equipment_bonus_stacking: EquipmentBonusStacking::default(),
            draw_policy: DrawPolicy::default(),
        }
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns.max(1);
        self
    }

    pub fn with_draw_policy(mut self, draw_policy: DrawPolicy) -> Self {
        self.draw_policy = draw_policy;
        self
    }

    pub fn with_equipment_bonus_stacking(mut self, stacking: EquipmentBonusStacking) -> Self {
        self.equipment_bonus_stacking = stacking;
        self
    }
}

/// Rejected configuration values.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("max_turns must be at least 1")]
    ZeroMaxTurns,

    #[error("hit chance bounds must satisfy 0 <= min <= max <= 1")]
    InvalidHitChanceBounds,

    #[error("config value `{0}` must be finite and non-negative")]
    InvalidValue(&'static str),
}

impl CombatError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroMaxTurns => "CONFIG_ZERO_MAX_TURNS",
            Self::InvalidHitChanceBounds => "CONFIG_INVALID_HIT_CHANCE_BOUNDS",
            Self::InvalidValue(_) => "CONFIG_INVALID_VALUE",
        }
    }
}

impl CombatConfig {
    /// Checks the values the engine divides, clamps or multiplies by.
    ///
    /// # Errors
    ///
    /// Returns the first offending value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_turns == 0 {
            return Err(ConfigError::ZeroMaxTurns);
        }
        let bounds_ok = self.min_hit_chance.is_finite()
            && self.max_hit_chance.is_finite()
            && 0.0 <= self.min_hit_chance
            && self.min_hit_chance <= self.max_hit_chance
            && self.max_hit_chance <= 1.0;
        if !bounds_ok {
            return Err(ConfigError::InvalidHitChanceBounds);
        }
        let values = [
            ("base_hit_chance", self.base_hit_chance),
            ("crit_per_luck", self.crit_per_luck),
            ("crit_cap", self.crit_cap),
            ("crit_multiplier", self.crit_multiplier),
            ("strong_multiplier", self.strong_multiplier),
            ("weak_multiplier", self.weak_multiplier),
            ("resistance_floor", self.resistance_floor),
            ("equipment_revive_fraction", self.equipment_revive_fraction),
            ("skill_revive_fraction", self.skill_revive_fraction),
            ("slow_speed_factor", self.slow_speed_factor),
        ];
        for (name, value) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue(name));
            }
        }
        Ok(())
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
