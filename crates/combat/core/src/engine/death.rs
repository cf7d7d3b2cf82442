//! Death handling.
//!
//! When a fighter's HP reaches zero the rescues are tried in order:
//!
//! 1. `death_resistance` roll: survive at `death_resistance_hp`.
//! 2. Unused equipment `revive_once`: survive at `equipment_revive_fraction`
//!    of max HP.
//! 3. Unused skill revive: survive at `skill_revive_fraction` of max HP.
//!
//! Only the skill revive is suppressed by skill-disabling statuses.

use crate::combat::CombatLog;
use crate::config::CombatConfig;
use crate::env::RandomSource;
use crate::skills::{ActivationEffect, HpContext, SkillKind, check_activation};

use super::battle::Fighter;

/// Returns `true` when the fighter is still standing afterwards.
pub(super) fn resolve_death(
    fighter: &mut Fighter,
    config: &CombatConfig,
    log: &mut CombatLog,
    rng: &mut dyn RandomSource,
) -> bool {
    if fighter.combatant.is_alive() {
        return true;
    }

    let max_hp = fighter.combatant.max_hp();
    let combatant = &mut fighter.combatant;

    if combatant
        .skill_bonuses
        .death_resistance
        .is_some_and(|chance| rng.chance(chance))
    {
        combatant.set_hp(config.death_resistance_hp.max(1));
        log.push(format!(
            "{} endures the fatal blow with {} HP!",
            combatant.name, combatant.current_hp
        ));
        return true;
    }

    if fighter.effects.has_revive_once() && !combatant.counters.equipment_revive_used {
        combatant.counters.equipment_revive_used = true;
        let hp = fraction_of(max_hp, config.equipment_revive_fraction);
        combatant.set_hp(hp);
        log.push(format!(
            "{}'s relic flares and restores {} HP!",
            combatant.name, combatant.current_hp
        ));
        tracing::debug!(name = %combatant.name, hp, "equipment revive consumed");
        return true;
    }

    if fighter.skills_enabled() {
        let hp = HpContext::new(0, max_hp);
        let activation = check_activation(&fighter.combatant, SkillKind::Revive, hp, config, rng);
        if let Some(activation) = activation {
            if let ActivationEffect::Revive { hp } = activation.effect {
                let combatant = &mut fighter.combatant;
                combatant.counters.revive_used = true;
                combatant.set_hp(hp);
                log.push(activation.message);
                tracing::debug!(name = %combatant.name, hp, "skill revive consumed");
                return true;
            }
        }
    }

    log.push(format!("{} has been defeated!", fighter.combatant.name));
    false
}

fn fraction_of(max_hp: u32, fraction: f64) -> u32 {
    let hp = (f64::from(max_hp) * fraction).floor();
    if hp.is_finite() {
        (hp.clamp(1.0, f64::from(max_hp.max(1)))) as u32
    } else {
        1
    }
}
