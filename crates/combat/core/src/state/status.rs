//! Status effect instances carried by a combatant.
//!
//! Effects count down in whole turns. An instance is removed on the tick
//! where `turns_remaining` reaches zero.
//!
//! # Re-application
//!
//! - Non-stacking kinds are replaced: the old instance is discarded and the
//!   new one appended.
//! - Stacking kinds refresh their duration and keep accumulated `stacks`.

use arrayvec::ArrayVec;

use crate::config::CombatConfig;
use crate::state::StatKind;

/// Types of status effects.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatusKind {
    // ========================================================================
    // Damage over time
    // ========================================================================
    Burn,
    Poison,
    Bleed,

    // ========================================================================
    // Crowd control
    // ========================================================================
    /// Skips the turn.
    Freeze,
    /// Skips the turn.
    Stun,
    /// Halves speed for turn order.
    Slow,
    /// Suppresses skill activations.
    Silence,

    // ========================================================================
    // Debuffs
    // ========================================================================
    Fear,
    Weaken,
    /// Stacking attack debuff.
    Curse,
    /// Stacking defense debuff.
    Corrode,

    // ========================================================================
    // Buffs
    // ========================================================================
    Regen,
    Fortify,
    Haste,
    Rage,
}

/// One active effect on a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffectInstance {
    pub kind: StatusKind,
    pub turns_remaining: u32,
    /// Duration the instance was (re)applied with.
    pub duration: u32,
    /// Present only on stacking kinds.
    pub stacks: Option<u32>,
}

impl StatusEffectInstance {
    pub fn new(kind: StatusKind, duration: u32) -> Self {
        Self {
            kind,
            turns_remaining: duration,
            duration,
            stacks: None,
        }
    }

    pub fn stacking(kind: StatusKind, duration: u32) -> Self {
        Self {
            stacks: Some(1),
            ..Self::new(kind, duration)
        }
    }

    pub fn is_expired(&self) -> bool {
        self.turns_remaining == 0
    }
}

/// Multiplicative change to one stat.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatModifier {
    pub stat: StatKind,
    pub multiplier: f64,
}

impl StatModifier {
    pub const fn new(stat: StatKind, multiplier: f64) -> Self {
        Self { stat, multiplier }
    }
}

/// Growth rule for stacking debuffs.
///
/// Each tick applies `1 + multiplier_per_turn * stacks` to `stat`, then
/// increments `stacks` up to `max_stacks`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StackingRule {
    pub stat: StatKind,
    pub multiplier_per_turn: f64,
    pub max_stacks: u32,
}

/// Static per-kind behavior, read from the status catalog.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct StatusEffectDefinition {
    pub kind: StatusKind,
    pub name: String,
    /// Fraction of max HP lost per tick.
    pub damage_per_turn: Option<f64>,
    /// Fraction of max HP restored per tick.
    pub heal_per_turn: Option<f64>,
    pub stat_buff: Vec<StatModifier>,
    pub stat_debuff: Vec<StatModifier>,
    pub skip_turn: bool,
    pub disables_skills: bool,
    pub stacking: Option<StackingRule>,
    pub duration: u32,
}

impl StatusEffectDefinition {
    pub fn new(kind: StatusKind, duration: u32) -> Self {
        Self {
            kind,
            name: kind.to_string(),
            damage_per_turn: None,
            heal_per_turn: None,
            stat_buff: Vec::new(),
            stat_debuff: Vec::new(),
            skip_turn: false,
            disables_skills: false,
            stacking: None,
            duration,
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn damage_per_turn(mut self, fraction: f64) -> Self {
        self.damage_per_turn = Some(fraction);
        self
    }

    pub fn heal_per_turn(mut self, fraction: f64) -> Self {
        self.heal_per_turn = Some(fraction);
        self
    }

    pub fn buff(mut self, stat: StatKind, multiplier: f64) -> Self {
        self.stat_buff.push(StatModifier::new(stat, multiplier));
        self
    }

    pub fn debuff(mut self, stat: StatKind, multiplier: f64) -> Self {
        self.stat_debuff.push(StatModifier::new(stat, multiplier));
        self
    }

    pub fn skips_turn(mut self) -> Self {
        self.skip_turn = true;
        self
    }

    pub fn disables_skills(mut self) -> Self {
        self.disables_skills = true;
        self
    }

    pub fn stacking(mut self, stat: StatKind, multiplier_per_turn: f64, max_stacks: u32) -> Self {
        self.stacking = Some(StackingRule {
            stat,
            multiplier_per_turn,
            max_stacks: max_stacks.max(1),
        });
        self
    }
}

impl Default for StatusEffectDefinition {
    fn default() -> Self {
        Self::new(StatusKind::Burn, 1)
    }
}

/// Ordered list of active effects on a combatant.
///
/// Holds at most one instance per kind, so it always has room for every
/// kind at once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffectInstance, { CombatConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffectInstance> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    /// Applies an effect with the replace/refresh policy.
    ///
    /// `stacking` selects the policy.
    pub fn apply(&mut self, kind: StatusKind, duration: u32, stacking: bool) {
        let duration = duration.max(1);

        if stacking {
            if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == kind) {
                existing.turns_remaining = duration;
                existing.duration = duration;
                existing.stacks.get_or_insert(1);
                return;
            }
            self.effects
                .push(StatusEffectInstance::stacking(kind, duration));
            return;
        }

        self.remove(kind);
        self.effects.push(StatusEffectInstance::new(kind, duration));
    }

    pub fn remove(&mut self, kind: StatusKind) {
        self.effects.retain(|e| e.kind != kind);
    }

    /// Removes every instance whose countdown reached zero, returning them in
    /// list order.
    pub fn remove_expired(&mut self) -> Vec<StatusEffectInstance> {
        let expired: Vec<_> = self
            .effects
            .iter()
            .filter(|e| e.is_expired())
            .copied()
            .collect();
        self.effects.retain(|e| !e.is_expired());
        expired
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffectInstance> {
        self.effects.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut StatusEffectInstance> {
        self.effects.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }
}

/// A later instance of a kind replaces an earlier one.
impl FromIterator<StatusEffectInstance> for StatusEffects {
    fn from_iter<I: IntoIterator<Item = StatusEffectInstance>>(iter: I) -> Self {
        let mut list = Self::empty();
        for effect in iter {
            list.remove(effect.kind);
            list.effects.push(effect);
        }
        list
    }
}
