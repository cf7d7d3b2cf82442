//! Turn-based creature combat rules.
//!
//! `combat-core` resolves a single battle between two combatants: hit and
//! damage rolls, type advantage, equipment procs, skill-tree bonuses and
//! timed status effects. Battles run through [`engine::BattleEngine`], which
//! reads static catalogs via the oracle traits in [`env`] and draws every
//! random number from an injected [`env::RandomSource`]. The crate performs
//! no I/O.
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod skills;
pub mod state;

pub use combat::{
    Advantage, AttackError, BattleOutcome, BattleResult, CombatLog, CombatantSummary, EffectMap,
    SpecialFlags, StatusTick, calculate_damage, calculate_hit_chance, resolve_effects,
    resolve_resistances, tick_status_effects, type_multiplier,
};
pub use config::{CombatConfig, ConfigError, DrawPolicy, EquipmentBonusStacking};
pub use engine::{BattleEngine, BattleEntrant, BattleError, BattleRequest};
pub use env::{
    CombatEnv, Env, FixedRandom, ItemOracle, OracleError, PcgRandom, RandomSource, STANDARD_STATUSES,
    SequenceRandom, SkillOracle, StandardStatuses, StatusOracle, compute_seed,
};
pub use error::{CombatError, ErrorSeverity};
pub use skills::{Activation, ActivationEffect, HpContext, SkillKind, apply_bonuses, check_activation};
pub use state::{
    BattleCounters, BattleMode, Combatant, ConsumableEffect, CreatureType, DamageBonuses,
    DefensiveEffect, Equipment, EquipmentSlot, ItemDefinition, ItemId, ItemSpecial,
    OffensiveEffect, PartyContext, RawStats, Resistances, Side, SkillBonuses, SkillDefinition,
    SkillId, SkillLevelEffect, SkillTree, StatDeltas, StatKind, StatModifier, Stats,
    StatusEffectDefinition, StatusEffectInstance, StatusEffects, StatusKind, UnlockedSkill,
    WeaponAbility, clone_combatant, normalize,
};
