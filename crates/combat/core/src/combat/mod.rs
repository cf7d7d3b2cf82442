//! Combat resolution building blocks.
//!
//! Pure functions and small value types composed by the engine. Every random
//! decision takes an explicit [`RandomSource`](crate::env::RandomSource).
//!
//! # Core Functions
//!
//! - `type_multiplier`: type advantage lookup
//! - `calculate_hit_chance` / `check_hit`: accuracy vs evasion
//! - `calculate_damage`: base damage, type, crit, resistance
//! - `resolve_effects`: equipment flattening
//! - `tick_status_effects`: per-round status processing
//! - `roll_weapon_proc` / `process_offensive` / `process_defensive`: equipment procs
//! - `first_actor`: turn order

pub mod advantage;
pub mod damage;
pub mod equipment;
pub mod hit;
pub mod log;
pub mod procs;
pub mod result;
pub mod status;
pub mod turn_order;

pub use advantage::{Advantage, advantage, type_multiplier, type_multiplier_by_name};
pub use damage::{
    AttackError, DamageInput, base_damage, calculate_crit_chance, calculate_damage,
    check_crit, resistance_multiplier,
};
pub use equipment::{
    EffectMap, SpecialFlags, resolve_combatant_effects, resolve_effects, resolve_resistances,
};
pub use hit::{calculate_hit_chance, check_hit};
pub use log::CombatLog;
pub use procs::{
    DefensiveOutcome, OffensiveOutcome, WeaponProc, WeaponProcOutcome, process_defensive,
    process_offensive, roll_weapon_proc, weapon_proc,
};
pub use result::{BattleOutcome, BattleResult, CombatantSummary};
pub use status::{StatusTick, TurnRestrictions, apply_status, tick_status_effects};
pub use turn_order::{effective_speed, first_actor};
