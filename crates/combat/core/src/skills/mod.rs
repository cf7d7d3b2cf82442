//! Skill engine: permanent bonuses from the skill tree and per-attack
//! activation rolls.
pub mod activation;
pub mod bonuses;

pub use activation::{
    ABYSSAL_DRAIN, ABYSSAL_MULTIPLIER, Activation, ActivationEffect, DARK_RITUAL_COST,
    DARK_RITUAL_MULTIPLIER, HpContext, LICH_DRAIN, LICH_MULTIPLIER, LICH_TURNS, OVERLOAD_MULTIPLIER,
    SkillKind, check_activation,
};
pub use bonuses::{PACK_HUNTER, apply_bonuses, apply_immediate, prerequisites_met};
