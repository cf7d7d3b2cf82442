//! Battle-local combatant state.

use crate::state::{
    CreatureType, Equipment, ItemSpecial, SkillBonuses, Stats, StatusEffects, normalize,
};

/// Temporary special-ability grant from a consumable.
///
/// Consumable grants are resolved exactly like an equipped item's special.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConsumableEffect {
    pub special: ItemSpecial,
    /// Battles left before the grant expires. Maintained by the caller.
    pub battles_remaining: u32,
}

impl ConsumableEffect {
    pub fn new(special: ItemSpecial, battles_remaining: u32) -> Self {
        Self {
            special,
            battles_remaining,
        }
    }
}

pub type ConsumableEffects = Vec<ConsumableEffect>;

/// One-shot resources and multi-turn mechanics tracked for a single battle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleCounters {
    /// Skill `revive_chance` already consumed.
    pub revive_used: bool,
    /// Equipment `revive_once` already consumed.
    pub equipment_revive_used: bool,
    pub resonance_stacks: u32,
    /// Damage held by an active paradox loop, reflected next round.
    pub paradox_stored: u32,
    /// Rounds left in lich form.
    pub lich_turns: u32,
}

/// One creature's working battle state.
///
/// Invariant: `current_hp <= stats.hp`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub name: String,
    pub creature_type: CreatureType,
    pub stats: Stats,
    pub current_hp: u32,
    pub equipment: Equipment,
    /// Derived once per battle from the skill tree; never persisted.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub skill_bonuses: SkillBonuses,
    pub status_effects: StatusEffects,
    pub consumable_effects: ConsumableEffects,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub counters: BattleCounters,
}

impl Combatant {
    /// Creates a combatant at full HP.
    pub fn new(name: impl Into<String>, creature_type: CreatureType, stats: Stats) -> Self {
        let stats = stats.normalized();
        Self {
            name: name.into(),
            creature_type,
            current_hp: stats.hp,
            stats,
            equipment: Equipment::empty(),
            skill_bonuses: SkillBonuses::default(),
            status_effects: StatusEffects::empty(),
            consumable_effects: Vec::new(),
            counters: BattleCounters::default(),
        }
    }

    pub fn with_equipment(mut self, equipment: Equipment) -> Self {
        self.equipment = equipment;
        self
    }

    pub fn with_current_hp(mut self, current_hp: u32) -> Self {
        self.current_hp = current_hp.min(self.stats.hp);
        self
    }

    pub fn with_status_effects(mut self, effects: StatusEffects) -> Self {
        self.status_effects = effects;
        self
    }

    pub fn with_skill_bonuses(mut self, bonuses: SkillBonuses) -> Self {
        self.skill_bonuses = bonuses;
        self
    }

    pub fn with_consumable(mut self, effect: ConsumableEffect) -> Self {
        self.consumable_effects.push(effect);
        self
    }

    pub fn max_hp(&self) -> u32 {
        self.stats.hp
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Reduces HP, returning the amount actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.current_hp);
        self.current_hp -= lost;
        lost
    }

    /// Restores HP up to max, returning the amount actually healed.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let healed = amount.min(self.max_hp() - self.current_hp.min(self.max_hp()));
        self.current_hp = (self.current_hp + healed).min(self.max_hp());
        healed
    }

    pub fn set_hp(&mut self, hp: u32) {
        self.current_hp = hp.min(self.max_hp());
    }

    /// Produces a structurally independent battle copy.
    ///
    /// Every nested collection is cloned, stats are re-normalized and
    /// `current_hp` is clamped to the normalized max.
    pub fn snapshot(&self) -> Self {
        let stats = normalize(&self.stats.to_raw());
        Self {
            name: self.name.clone(),
            creature_type: self.creature_type,
            stats,
            current_hp: self.current_hp.min(stats.hp),
            equipment: self.equipment.clone(),
            skill_bonuses: self.skill_bonuses.clone(),
            status_effects: self.status_effects.clone(),
            consumable_effects: self.consumable_effects.clone(),
            counters: self.counters,
        }
    }
}

/// Battle-local working copy of a combatant. See [`Combatant::snapshot`].
pub fn clone_combatant(combatant: &Combatant) -> Combatant {
    combatant.snapshot()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ItemSpecial, OffensiveEffect, StatusKind, WeaponAbility};

    #[test]
    fn snapshot_is_independent() {
        let original = Combatant::new("Fang", CreatureType::Beast, Stats::new(80, 20.0, 5.0, 12.0));
        let mut copy = clone_combatant(&original);

        copy.take_damage(30);
        copy.status_effects.apply(StatusKind::Burn, 3, false);
        copy.counters.revive_used = true;

        assert_eq!(original.current_hp, 80);
        assert!(original.status_effects.is_empty());
        assert!(!original.counters.revive_used);
        assert_eq!(copy.current_hp, 50);
    }

    #[test]
    fn snapshot_clamps_hp_to_normalized_max() {
        let mut original = Combatant::new("Husk", CreatureType::Undead, Stats::default());
        original.stats.hp = 0;
        original.current_hp = 40;

        let copy = original.snapshot();
        assert_eq!(copy.stats.hp, 1);
        assert_eq!(copy.current_hp, 1);
    }

    #[test]
    fn every_consumable_grant_is_kept() {
        let specials = [
            ItemSpecial::Weapon(WeaponAbility::FlameStrike),
            ItemSpecial::Weapon(WeaponAbility::Cleave),
            ItemSpecial::Offensive(OffensiveEffect::VampiricEdge),
            ItemSpecial::Offensive(OffensiveEffect::FrostAura),
            ItemSpecial::ReviveOnce,
        ];
        let c = specials.into_iter().fold(
            Combatant::new("Alchemist", CreatureType::Mystic, Stats::default()),
            |c, special| c.with_consumable(ConsumableEffect::new(special, 1)),
        );

        assert_eq!(c.consumable_effects.len(), 5);
        assert_eq!(c.consumable_effects[4].special, ItemSpecial::ReviveOnce);
        assert_eq!(clone_combatant(&c).consumable_effects, c.consumable_effects);
    }

    #[test]
    fn heal_and_damage_stay_in_bounds() {
        let mut c = Combatant::new("Gear", CreatureType::Mechanical, Stats::new(50, 10.0, 5.0, 5.0));
        assert_eq!(c.take_damage(80), 50);
        assert!(!c.is_alive());
        assert_eq!(c.heal(70), 50);
        assert_eq!(c.current_hp, 50);
    }
}
