//! Weapon and equipment proc engine.
//!
//! Weapon abilities short-circuit: only the first ability that rolls fires on
//! a given attack. Offensive and defensive equipment effects roll
//! independently and may stack with the weapon proc and with each other.

use crate::combat::equipment::EffectMap;
use crate::env::RandomSource;
use crate::state::{DefensiveEffect, OffensiveEffect, StatusKind, WeaponAbility};

/// Fixed proc profile of a weapon ability.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponProc {
    pub chance: f64,
    /// Bonus damage as a fraction of the attacker's attack.
    pub damage_multiplier: f64,
    pub inflicts: Option<StatusKind>,
}

const fn proc(chance: f64, damage_multiplier: f64, inflicts: Option<StatusKind>) -> WeaponProc {
    WeaponProc {
        chance,
        damage_multiplier,
        inflicts,
    }
}

/// Weapon ability catalog.
pub const fn weapon_proc(ability: WeaponAbility) -> WeaponProc {
    use StatusKind::*;
    use WeaponAbility::*;
    match ability {
        FlameStrike => proc(0.15, 0.5, Some(Burn)),
        FrostBite => proc(0.15, 0.4, Some(Freeze)),
        ThunderClap => proc(0.12, 0.6, Some(Stun)),
        VenomFang => proc(0.20, 0.3, Some(Poison)),
        Cleave => proc(0.20, 0.5, None),
        ArmorPierce => proc(0.20, 0.4, Some(Corrode)),
        Bloodletter => proc(0.20, 0.3, Some(Bleed)),
        Quake => proc(0.10, 0.7, Some(Stun)),
        ShadowStrike => proc(0.15, 0.6, Some(Fear)),
        HolySmite => proc(0.15, 0.5, Some(Weaken)),
        ArcaneBurst => proc(0.12, 0.8, Some(Silence)),
        TidalWave => proc(0.15, 0.5, Some(Slow)),
        SoulReap => proc(0.10, 0.9, Some(Curse)),
        StormCall => proc(0.12, 0.6, None),
        AcidSplash => proc(0.18, 0.3, Some(Corrode)),
        Rend => proc(0.20, 0.4, Some(Bleed)),
        VoidRift => proc(0.08, 1.0, Some(Silence)),
    }
}

pub const fn offensive_chance(effect: OffensiveEffect) -> f64 {
    match effect {
        OffensiveEffect::FrostAura => 0.20,
        OffensiveEffect::TerrorAura => 0.15,
        OffensiveEffect::NullField => 0.10,
        OffensiveEffect::VampiricEdge => 0.25,
    }
}

pub const fn defensive_chance(effect: DefensiveEffect) -> f64 {
    match effect {
        DefensiveEffect::ShieldBlock => 0.20,
        DefensiveEffect::BurningCounter => 0.25,
        DefensiveEffect::ThornMail => 0.30,
        DefensiveEffect::StoneSkin => 0.20,
    }
}

/// Damage a shield block removes.
pub const SHIELD_BLOCK_AMOUNT: u32 = 8;
/// Fraction of dealt damage healed by vampiric edge.
pub const VAMPIRIC_FRACTION: f64 = 0.2;
/// Fraction of received damage reflected by thorn mail.
pub const THORN_FRACTION: f64 = 0.15;

/// A weapon ability that fired.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponProcOutcome {
    pub ability: WeaponAbility,
    pub bonus_damage: f64,
    pub inflicts: Option<StatusKind>,
}

/// Rolls the attacker's weapon abilities in catalog order; the first success
/// fires and the rest are not rolled.
pub fn roll_weapon_proc(
    effects: &EffectMap,
    attacker_atk: f64,
    rng: &mut dyn RandomSource,
) -> Option<WeaponProcOutcome> {
    effects.weapon_abilities().find_map(|ability| {
        let profile = weapon_proc(ability);
        rng.chance(profile.chance).then(|| WeaponProcOutcome {
            ability,
            bonus_damage: attacker_atk * profile.damage_multiplier,
            inflicts: profile.inflicts,
        })
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OffensiveOutcome {
    Inflict(StatusKind),
    Heal(u32),
}

/// Rolls every offensive effect independently after a landed hit.
pub fn process_offensive(
    effects: &EffectMap,
    damage_dealt: u32,
    rng: &mut dyn RandomSource,
) -> Vec<(OffensiveEffect, OffensiveOutcome)> {
    effects
        .offensive_effects()
        .filter(|effect| rng.chance(offensive_chance(*effect)))
        .map(|effect| {
            let outcome = match effect {
                OffensiveEffect::FrostAura => OffensiveOutcome::Inflict(StatusKind::Slow),
                OffensiveEffect::TerrorAura => OffensiveOutcome::Inflict(StatusKind::Fear),
                OffensiveEffect::NullField => OffensiveOutcome::Inflict(StatusKind::Silence),
                OffensiveEffect::VampiricEdge => OffensiveOutcome::Heal(
                    (f64::from(damage_dealt) * VAMPIRIC_FRACTION).floor() as u32,
                ),
            };
            (effect, outcome)
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefensiveOutcome {
    /// Incoming damage reduced by this amount.
    Block(u32),
    /// Attacker is burned.
    BurnAttacker,
    /// Damage reflected to the attacker.
    Reflect(u32),
    /// Wearer gains fortify.
    Fortify,
}

/// Rolls every defensive effect independently when the wearer is hit.
pub fn process_defensive(
    effects: &EffectMap,
    incoming_damage: u32,
    rng: &mut dyn RandomSource,
) -> Vec<(DefensiveEffect, DefensiveOutcome)> {
    effects
        .defensive_effects()
        .filter(|effect| rng.chance(defensive_chance(*effect)))
        .map(|effect| {
            let outcome = match effect {
                DefensiveEffect::ShieldBlock => DefensiveOutcome::Block(SHIELD_BLOCK_AMOUNT),
                DefensiveEffect::BurningCounter => DefensiveOutcome::BurnAttacker,
                DefensiveEffect::ThornMail => DefensiveOutcome::Reflect(
                    (f64::from(incoming_damage) * THORN_FRACTION).floor() as u32,
                ),
                DefensiveEffect::StoneSkin => DefensiveOutcome::Fortify,
            };
            (effect, outcome)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::equipment::SpecialFlags;
    use crate::env::{FixedRandom, SequenceRandom};
    use crate::state::ItemSpecial;

    fn effects_with(specials: &[ItemSpecial]) -> EffectMap {
        let mut effects = EffectMap::default();
        for special in specials {
            effects.specials |= SpecialFlags::of(*special);
        }
        effects
    }

    #[test]
    fn only_first_successful_weapon_ability_fires() {
        let effects = effects_with(&[
            ItemSpecial::Weapon(WeaponAbility::FlameStrike),
            ItemSpecial::Weapon(WeaponAbility::Cleave),
        ]);
        let mut rng = SequenceRandom::new(vec![0.0, 0.0]);
        let outcome = roll_weapon_proc(&effects, 20.0, &mut rng);

        assert_eq!(outcome.map(|o| o.ability), Some(WeaponAbility::FlameStrike));
        assert_eq!(outcome.map(|o| o.bonus_damage), Some(10.0));
        assert_eq!(rng.draws(), 1);
    }

    #[test]
    fn failed_roll_falls_through_to_next_ability() {
        let effects = effects_with(&[
            ItemSpecial::Weapon(WeaponAbility::FlameStrike),
            ItemSpecial::Weapon(WeaponAbility::Cleave),
        ]);
        let mut rng = SequenceRandom::new(vec![0.9, 0.1]);
        let outcome = roll_weapon_proc(&effects, 20.0, &mut rng);
        assert_eq!(outcome.map(|o| o.ability), Some(WeaponAbility::Cleave));
        assert_eq!(outcome.and_then(|o| o.inflicts), None);
    }

    #[test]
    fn equipment_effects_stack() {
        let effects = effects_with(&[
            ItemSpecial::Defensive(DefensiveEffect::ShieldBlock),
            ItemSpecial::Defensive(DefensiveEffect::ThornMail),
        ]);
        let outcomes = process_defensive(&effects, 40, &mut FixedRandom(0.0));
        assert_eq!(
            outcomes,
            vec![
                (DefensiveEffect::ShieldBlock, DefensiveOutcome::Block(8)),
                (DefensiveEffect::ThornMail, DefensiveOutcome::Reflect(6)),
            ]
        );
    }

    #[test]
    fn vampiric_edge_heals_from_damage_dealt() {
        let effects = effects_with(&[ItemSpecial::Offensive(OffensiveEffect::VampiricEdge)]);
        let outcomes = process_offensive(&effects, 50, &mut FixedRandom(0.0));
        assert_eq!(
            outcomes,
            vec![(OffensiveEffect::VampiricEdge, OffensiveOutcome::Heal(10))]
        );
    }
}
