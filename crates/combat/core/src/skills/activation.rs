//! Probabilistic skill activations.
//!
//! [`check_activation`] performs at most one roll per call, gated by the
//! bonus field that drives the kind. Kinds whose field is absent return
//! `None` without drawing.
//!
//! # Attack-replacing kinds
//!
//! [`SkillKind::EXCLUSIVE`] lists the kinds that replace a normal attack.
//! Within one attack the orchestrator stops checking once one of them fires.

use crate::config::CombatConfig;
use crate::env::RandomSource;
use crate::state::Combatant;

/// Every skill activation the engine rolls for.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SkillKind {
    Dodge,
    Counter,
    Execute,
    DivineProtection,
    Overload,
    DarkRitual,
    LichTransformation,
    Lifesteal,
    MultiAttack,
    HpRegen,
    CelestialBarrier,
    Revive,
    ChainReaction,
    SelfRepair,
    ElementalShield,
    ElementalStorm,
    AbyssalDevourer,
    TemporalEcho,
    ParadoxLoop,
}

impl SkillKind {
    /// Kinds that replace the attack, in check order.
    pub const EXCLUSIVE: [SkillKind; 6] = [
        SkillKind::Execute,
        SkillKind::Overload,
        SkillKind::DarkRitual,
        SkillKind::LichTransformation,
        SkillKind::ElementalStorm,
        SkillKind::AbyssalDevourer,
    ];

    /// Defender kinds that negate an incoming attack, in check order.
    pub const EVASIVE: [SkillKind; 3] = [
        SkillKind::ParadoxLoop,
        SkillKind::DivineProtection,
        SkillKind::Dodge,
    ];

    /// Defender kinds that reduce a landed hit.
    pub const BARRIERS: [SkillKind; 2] = [SkillKind::CelestialBarrier, SkillKind::ElementalShield];

    pub fn is_exclusive(self) -> bool {
        Self::EXCLUSIVE.contains(&self)
    }
}

pub const OVERLOAD_MULTIPLIER: f64 = 2.0;
pub const DARK_RITUAL_MULTIPLIER: f64 = 2.5;
/// Fraction of current HP sacrificed by a dark ritual.
pub const DARK_RITUAL_COST: f64 = 0.1;
pub const LICH_MULTIPLIER: f64 = 1.5;
pub const LICH_TURNS: u32 = 3;
/// Fraction of dealt damage drained while in lich form.
pub const LICH_DRAIN: f64 = 0.25;
pub const ELEMENTAL_STORM_MULTIPLIER: f64 = 1.8;
pub const ABYSSAL_MULTIPLIER: f64 = 2.0;
pub const ABYSSAL_DRAIN: f64 = 0.5;
pub const CELESTIAL_BARRIER_REDUCTION: f64 = 0.5;
pub const ELEMENTAL_SHIELD_REDUCTION: f64 = 0.3;
pub const CHAIN_REACTION_MULTIPLIER: f64 = 0.5;
pub const MULTI_ATTACK_MULTIPLIER: f64 = 0.5;

const DEFAULT_COUNTER_MULTIPLIER: f64 = 0.5;
const DEFAULT_LIFESTEAL_PERCENT: f64 = 0.2;
const DEFAULT_ECHO_MULTIPLIER: f64 = 0.5;
const DEFAULT_RECOIL_PERCENT: f64 = 0.5;

/// Payload of a successful activation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ActivationEffect {
    /// Incoming attack is negated.
    Evade,
    /// Strike back for `atk * multiplier`.
    Counter { multiplier: f64 },
    /// Target is slain outright.
    Execute,
    /// Attack multiplied; `hp_cost` is paid first; `drain` heals from damage.
    Empower {
        multiplier: f64,
        hp_cost: u32,
        drain: f64,
    },
    /// Enter lich form for `turns` rounds.
    Transform { turns: u32 },
    /// Heal for a fraction of damage dealt.
    Lifesteal { percent: f64 },
    /// Additional strikes at `multiplier` of the hit.
    ExtraHits { hits: u32, multiplier: f64 },
    /// Flat heal.
    Heal { amount: u32 },
    /// Incoming damage reduced by `reduction`.
    Barrier { reduction: f64 },
    /// Survive at `hp`.
    Revive { hp: u32 },
    /// Bonus damage at `multiplier` of the hit.
    Chain { multiplier: f64 },
    /// Echo hit at `multiplier` of the hit.
    Echo { multiplier: f64 },
    /// Negate the attack and reflect `recoil` of it next round.
    Paradox { recoil: f64 },
}

/// A skill that fired.
#[derive(Clone, Debug, PartialEq)]
pub struct Activation {
    pub kind: SkillKind,
    pub message: String,
    pub effect: ActivationEffect,
}

impl Activation {
    fn new(kind: SkillKind, message: String, effect: ActivationEffect) -> Self {
        Self {
            kind,
            message,
            effect,
        }
    }
}

/// HP context for kinds that depend on it.
///
/// `Execute` reads the target's HP; `SelfRepair` and `Revive` read the
/// owner's.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HpContext {
    pub current_hp: Option<u32>,
    pub max_hp: Option<u32>,
}

impl HpContext {
    pub fn new(current_hp: u32, max_hp: u32) -> Self {
        Self {
            current_hp: Some(current_hp),
            max_hp: Some(max_hp),
        }
    }

    fn fraction(&self) -> Option<f64> {
        match (self.current_hp, self.max_hp) {
            (Some(current), Some(max)) if max > 0 => Some(f64::from(current) / f64::from(max)),
            _ => None,
        }
    }
}

/// Rolls one skill activation for `owner`.
pub fn check_activation(
    owner: &Combatant,
    kind: SkillKind,
    hp: HpContext,
    config: &CombatConfig,
    rng: &mut dyn RandomSource,
) -> Option<Activation> {
    use ActivationEffect as E;
    use SkillKind::*;

    let bonuses = &owner.skill_bonuses;
    let name = owner.name.as_str();
    let mut roll = |p: Option<f64>| p.is_some_and(|p| rng.chance(p));

    match kind {
        Dodge => roll(bonuses.dodge_chance).then(|| {
            Activation::new(kind, format!("{name} dodges the attack!"), E::Evade)
        }),
        Counter => roll(bonuses.counter_chance).then(|| {
            let multiplier = bonuses
                .counter_multiplier
                .unwrap_or(DEFAULT_COUNTER_MULTIPLIER);
            Activation::new(kind, format!("{name} counterattacks!"), E::Counter { multiplier })
        }),
        Execute => {
            let threshold = bonuses.execute_threshold?;
            if hp.fraction()? > threshold {
                return None;
            }
            roll(Some(bonuses.execute_chance.unwrap_or(1.0))).then(|| {
                Activation::new(kind, format!("{name} executes a weakened foe!"), E::Execute)
            })
        }
        DivineProtection => roll(bonuses.divine_protection_chance).then(|| {
            Activation::new(
                kind,
                format!("Divine protection shields {name} from harm!"),
                E::Evade,
            )
        }),
        Overload => roll(bonuses.overload_chance).then(|| {
            Activation::new(
                kind,
                format!("{name} overloads its circuits!"),
                E::Empower {
                    multiplier: OVERLOAD_MULTIPLIER,
                    hp_cost: 0,
                    drain: 0.0,
                },
            )
        }),
        DarkRitual => roll(bonuses.dark_ritual_chance).then(|| {
            let current = hp.current_hp.unwrap_or(owner.current_hp);
            let hp_cost = (f64::from(current) * DARK_RITUAL_COST).floor() as u32;
            Activation::new(
                kind,
                format!("{name} sacrifices {hp_cost} HP in a dark ritual!"),
                E::Empower {
                    multiplier: DARK_RITUAL_MULTIPLIER,
                    hp_cost,
                    drain: 0.0,
                },
            )
        }),
        LichTransformation => {
            if owner.counters.lich_turns > 0 {
                return None;
            }
            roll(bonuses.lich_chance).then(|| {
                Activation::new(
                    kind,
                    format!("{name} rises in lich form!"),
                    E::Transform { turns: LICH_TURNS },
                )
            })
        }
        Lifesteal => roll(bonuses.lifesteal_chance).then(|| {
            let percent = bonuses.lifesteal_percent.unwrap_or(DEFAULT_LIFESTEAL_PERCENT);
            Activation::new(kind, format!("{name} drains life!"), E::Lifesteal { percent })
        }),
        MultiAttack => roll(bonuses.multi_attack_chance).then(|| {
            Activation::new(
                kind,
                format!("{name} strikes again!"),
                E::ExtraHits {
                    hits: 1,
                    multiplier: MULTI_ATTACK_MULTIPLIER,
                },
            )
        }),
        HpRegen => {
            let fraction = bonuses.hp_regen.filter(|f| *f > 0.0)?;
            let amount = fraction_of(hp.max_hp.unwrap_or(owner.max_hp()), fraction);
            (amount > 0).then(|| {
                Activation::new(kind, format!("{name} regenerates {amount} HP."), E::Heal { amount })
            })
        }
        CelestialBarrier => roll(bonuses.celestial_barrier_chance).then(|| {
            Activation::new(
                kind,
                format!("A celestial barrier surrounds {name}!"),
                E::Barrier {
                    reduction: CELESTIAL_BARRIER_REDUCTION,
                },
            )
        }),
        Revive => {
            if owner.counters.revive_used {
                return None;
            }
            roll(bonuses.revive_chance).then(|| {
                let max = hp.max_hp.unwrap_or(owner.max_hp());
                let restored = fraction_of(max, config.skill_revive_fraction).max(1);
                Activation::new(
                    kind,
                    format!("{name} refuses to fall and revives with {restored} HP!"),
                    E::Revive { hp: restored },
                )
            })
        }
        ChainReaction => roll(bonuses.chain_reaction_chance).then(|| {
            Activation::new(
                kind,
                format!("{name} triggers a chain reaction!"),
                E::Chain {
                    multiplier: CHAIN_REACTION_MULTIPLIER,
                },
            )
        }),
        SelfRepair => {
            let fraction = bonuses.self_repair.filter(|f| *f > 0.0)?;
            if hp.fraction()? >= 0.5 {
                return None;
            }
            let amount = fraction_of(hp.max_hp.unwrap_or(owner.max_hp()), fraction);
            (amount > 0).then(|| {
                Activation::new(kind, format!("{name} repairs itself for {amount} HP."), E::Heal { amount })
            })
        }
        ElementalShield => roll(bonuses.elemental_shield_chance).then(|| {
            Activation::new(
                kind,
                format!("An elemental shield absorbs part of the blow to {name}!"),
                E::Barrier {
                    reduction: ELEMENTAL_SHIELD_REDUCTION,
                },
            )
        }),
        ElementalStorm => roll(bonuses.elemental_storm_chance).then(|| {
            Activation::new(
                kind,
                format!("{name} unleashes an elemental storm!"),
                E::Empower {
                    multiplier: ELEMENTAL_STORM_MULTIPLIER,
                    hp_cost: 0,
                    drain: 0.0,
                },
            )
        }),
        AbyssalDevourer => roll(bonuses.abyssal_devourer_chance).then(|| {
            Activation::new(
                kind,
                format!("{name} calls the abyssal devourer!"),
                E::Empower {
                    multiplier: ABYSSAL_MULTIPLIER,
                    hp_cost: 0,
                    drain: ABYSSAL_DRAIN,
                },
            )
        }),
        TemporalEcho => roll(bonuses.temporal_echo_chance).then(|| {
            let multiplier = bonuses
                .echo_damage_multiplier
                .unwrap_or(DEFAULT_ECHO_MULTIPLIER);
            Activation::new(kind, format!("A temporal echo of {name} strikes!"), E::Echo { multiplier })
        }),
        ParadoxLoop => roll(bonuses.paradox_loop_chance).then(|| {
            let recoil = bonuses.recoil_percent.unwrap_or(DEFAULT_RECOIL_PERCENT);
            Activation::new(
                kind,
                format!("{name} folds time into a paradox loop!"),
                E::Paradox { recoil },
            )
        }),
    }
}

fn fraction_of(max_hp: u32, fraction: f64) -> u32 {
    if !fraction.is_finite() || fraction <= 0.0 {
        return 0;
    }
    (f64::from(max_hp) * fraction)
        .floor()
        .min(f64::from(u32::MAX)) as u32
}
