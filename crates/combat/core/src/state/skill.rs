//! Skill tree records and the typed skill bonus record.
//!
//! The skill tree is persisted outside the engine and read-only during a
//! battle. Skill definitions are static content, one catalog per creature
//! type.

use std::fmt;

use crate::state::{BattleMode, CreatureType, StatusKind};

/// Stable identifier of a skill within its creature type's catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SkillId(pub String);

impl SkillId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SkillId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One unlocked skill at a level.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnlockedSkill {
    pub skill_id: SkillId,
    pub level: u32,
}

/// A creature's skill tree progress.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkillTree {
    pub skill_points: u32,
    pub unlocked: Vec<UnlockedSkill>,
}

impl SkillTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_skill(mut self, skill_id: impl Into<SkillId>, level: u32) -> Self {
        self.unlocked.push(UnlockedSkill {
            skill_id: skill_id.into(),
            level,
        });
        self
    }

    /// Level of a skill, 0 when not unlocked.
    pub fn level_of(&self, skill_id: &SkillId) -> u32 {
        self.unlocked
            .iter()
            .filter(|s| &s.skill_id == skill_id)
            .map(|s| s.level)
            .max()
            .unwrap_or(0)
    }
}

/// Bonus granted by one level of a skill.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct SkillLevelEffect {
    pub description: String,
    pub bonus: SkillBonuses,
}

/// Static skill definition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct SkillDefinition {
    pub id: SkillId,
    pub name: String,
    pub creature_type: CreatureType,
    pub max_level: u32,
    /// Restricts the skill to one battle mode.
    #[cfg_attr(feature = "serde", serde(default))]
    pub battle_type: Option<BattleMode>,
    /// Skills that must be at level 1 or higher first.
    #[cfg_attr(feature = "serde", serde(default))]
    pub prerequisites: Vec<SkillId>,
    /// Effects indexed by `level - 1`.
    pub effects: Vec<SkillLevelEffect>,
}

impl SkillDefinition {
    pub fn new(id: impl Into<SkillId>, name: &str, creature_type: CreatureType) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            creature_type,
            max_level: 0,
            battle_type: None,
            prerequisites: Vec::new(),
            effects: Vec::new(),
        }
    }

    pub fn level(mut self, bonus: SkillBonuses) -> Self {
        self.effects.push(SkillLevelEffect {
            description: String::new(),
            bonus,
        });
        self.max_level = self.effects.len() as u32;
        self
    }

    pub fn requires(mut self, prerequisite: impl Into<SkillId>) -> Self {
        self.prerequisites.push(prerequisite.into());
        self
    }

    pub fn only_in(mut self, mode: BattleMode) -> Self {
        self.battle_type = Some(mode);
        self
    }

    /// Bonus for a level, clamped to `max_level`. `None` for level 0.
    pub fn bonus_at(&self, level: u32) -> Option<&SkillBonuses> {
        let level = level.min(self.max_level);
        if level == 0 {
            return None;
        }
        self.effects.get(level as usize - 1).map(|e| &e.bonus)
    }
}

/// Every bonus a skill can grant.
///
/// Immediate transforms are folded into the combatant's stats when bonuses
/// are applied; the remaining fields seed per-attack activation rolls.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct SkillBonuses {
    // ========================================================================
    // Immediate stat transforms
    // ========================================================================
    pub atk_multiplier: Option<f64>,
    pub def_bonus: Option<f64>,
    pub spd_bonus: Option<f64>,
    /// Fractional increase to atk, def and spd.
    pub all_stats: Option<f64>,
    /// Fractional attack increase from arcane power.
    pub magic_damage: Option<f64>,
    /// Fraction of incoming damage ignored.
    pub damage_reduction: Option<f64>,
    /// Converted to luck at 100 luck per 1.0 crit chance.
    pub crit_chance: Option<f64>,
    /// Fractional attack increase when hunting with other beasts.
    pub pack_bonus: Option<f64>,

    // ========================================================================
    // Defensive activations
    // ========================================================================
    pub dodge_chance: Option<f64>,
    pub counter_chance: Option<f64>,
    pub counter_multiplier: Option<f64>,
    pub divine_protection_chance: Option<f64>,
    pub celestial_barrier_chance: Option<f64>,
    pub elemental_shield_chance: Option<f64>,
    pub paradox_loop_chance: Option<f64>,
    pub recoil_percent: Option<f64>,

    // ========================================================================
    // Offensive activations
    // ========================================================================
    pub execute_threshold: Option<f64>,
    pub execute_chance: Option<f64>,
    pub overload_chance: Option<f64>,
    pub dark_ritual_chance: Option<f64>,
    pub lich_chance: Option<f64>,
    pub elemental_storm_chance: Option<f64>,
    pub abyssal_devourer_chance: Option<f64>,
    pub lifesteal_chance: Option<f64>,
    pub lifesteal_percent: Option<f64>,
    pub multi_attack_chance: Option<f64>,
    pub chain_reaction_chance: Option<f64>,
    pub temporal_echo_chance: Option<f64>,
    pub echo_damage_multiplier: Option<f64>,
    pub resonance_per_stack: Option<f64>,
    pub resonance_max_stacks: Option<u32>,
    pub inflict_chance: Option<f64>,
    pub inflict_status: Option<StatusKind>,

    // ========================================================================
    // Sustain and survival
    // ========================================================================
    /// Fraction of max HP restored at end of round.
    pub hp_regen: Option<f64>,
    /// Fraction of max HP restored at end of round while below half HP.
    pub self_repair: Option<f64>,
    pub revive_chance: Option<f64>,
    pub death_resistance: Option<f64>,
}

macro_rules! merge_fields {
    ($target:expr, $source:expr; $($field:ident),+ $(,)?) => {
        $(
            if $source.$field.is_some() {
                $target.$field = $source.$field;
            }
        )+
    };
}

impl SkillBonuses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field-wise last-writer-wins merge.
    pub fn merge(&mut self, other: &SkillBonuses) {
        merge_fields!(self, other;
            atk_multiplier, def_bonus, spd_bonus, all_stats, magic_damage,
            damage_reduction, crit_chance, pack_bonus,
            dodge_chance, counter_chance, counter_multiplier, divine_protection_chance,
            celestial_barrier_chance, elemental_shield_chance, paradox_loop_chance,
            recoil_percent,
            execute_threshold, execute_chance, overload_chance, dark_ritual_chance,
            lich_chance, elemental_storm_chance, abyssal_devourer_chance,
            lifesteal_chance, lifesteal_percent, multi_attack_chance,
            chain_reaction_chance, temporal_echo_chance, echo_damage_multiplier,
            resonance_per_stack, resonance_max_stacks, inflict_chance, inflict_status,
            hp_regen, self_repair, revive_chance, death_resistance,
        );
    }

    /// Returns a copy with every numeric magnitude doubled.
    ///
    /// Used by pack hunting; identifiers and stack caps are left alone.
    pub fn doubled(&self) -> Self {
        fn twice(value: Option<f64>) -> Option<f64> {
            value.map(|v| v * 2.0)
        }
        Self {
            atk_multiplier: self.atk_multiplier.map(|m| 1.0 + (m - 1.0) * 2.0),
            def_bonus: twice(self.def_bonus),
            spd_bonus: twice(self.spd_bonus),
            all_stats: twice(self.all_stats),
            magic_damage: twice(self.magic_damage),
            damage_reduction: twice(self.damage_reduction),
            crit_chance: twice(self.crit_chance),
            pack_bonus: twice(self.pack_bonus),
            ..self.clone()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_is_last_writer_wins() {
        let mut merged = SkillBonuses {
            dodge_chance: Some(0.1),
            counter_chance: Some(0.2),
            ..SkillBonuses::default()
        };
        merged.merge(&SkillBonuses {
            dodge_chance: Some(0.3),
            ..SkillBonuses::default()
        });
        assert_eq!(merged.dodge_chance, Some(0.3));
        assert_eq!(merged.counter_chance, Some(0.2));
    }

    #[test]
    fn bonus_at_clamps_to_max_level() {
        let skill = SkillDefinition::new("swift", "Swift", CreatureType::Beast)
            .level(SkillBonuses {
                spd_bonus: Some(2.0),
                ..SkillBonuses::default()
            })
            .level(SkillBonuses {
                spd_bonus: Some(4.0),
                ..SkillBonuses::default()
            });
        assert!(skill.bonus_at(0).is_none());
        assert_eq!(skill.bonus_at(1).and_then(|b| b.spd_bonus), Some(2.0));
        assert_eq!(skill.bonus_at(9).and_then(|b| b.spd_bonus), Some(4.0));
    }

    #[test]
    fn doubled_scales_multiplier_increment() {
        let bonus = SkillBonuses {
            atk_multiplier: Some(1.1),
            pack_bonus: Some(0.15),
            resonance_max_stacks: Some(5),
            ..SkillBonuses::default()
        };
        let doubled = bonus.doubled();
        assert!((doubled.atk_multiplier.unwrap_or_default() - 1.2).abs() < 1e-9);
        assert!((doubled.pack_bonus.unwrap_or_default() - 0.3).abs() < 1e-9);
        assert_eq!(doubled.resonance_max_stacks, Some(5));
    }
}
