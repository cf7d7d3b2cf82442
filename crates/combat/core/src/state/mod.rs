//! Combatant state and the static records it references.
mod combatant;
mod creature;
mod equipment;
mod skill;
mod stats;
mod status;

pub use combatant::{
    BattleCounters, Combatant, ConsumableEffect, ConsumableEffects, clone_combatant,
};
pub use creature::{BattleMode, CreatureType, PartyContext, Side};
pub use equipment::{
    DamageBonuses, DefensiveEffect, Equipment, EquipmentBuilder, EquipmentSlot, ItemDefinition,
    ItemId, ItemSpecial, OffensiveEffect, Resistances, StatDeltas, WeaponAbility,
};
pub use skill::{SkillBonuses, SkillDefinition, SkillId, SkillLevelEffect, SkillTree, UnlockedSkill};
pub use stats::{RawStats, StatKind, Stats, floors, normalize};
pub use status::{
    StackingRule, StatModifier, StatusEffectDefinition, StatusEffectInstance, StatusEffects,
    StatusKind,
};
