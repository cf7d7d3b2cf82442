//! Status effect engine.
//!
//! Ticked once per round for each combatant, independently. A tick applies
//! damage and healing over time, builds a stat snapshot valid for this round
//! only, and counts every effect down by one turn.

use bitflags::bitflags;

use crate::combat::log::CombatLog;
use crate::env::StatusOracle;
use crate::state::{Combatant, Stats, StatusKind};

bitflags! {
    /// Restrictions imposed by status effects for the current round.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct TurnRestrictions: u8 {
        const CANNOT_ACT      = 1 << 0;
        const SKILLS_DISABLED = 1 << 1;
    }
}

/// Outcome of one status tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatusTick {
    /// Stats for this round only; base stats are untouched.
    pub stats: Stats,
    pub restrictions: TurnRestrictions,
}

impl StatusTick {
    pub fn can_act(&self) -> bool {
        !self.restrictions.contains(TurnRestrictions::CANNOT_ACT)
    }

    pub fn skills_disabled(&self) -> bool {
        self.restrictions.contains(TurnRestrictions::SKILLS_DISABLED)
    }
}

/// Ticks every active effect on `combatant` in list order.
///
/// Kinds missing from the catalog are counted down but otherwise inert.
pub fn tick_status_effects(
    combatant: &mut Combatant,
    statuses: &(impl StatusOracle + ?Sized),
    log: &mut CombatLog,
) -> StatusTick {
    let max_hp = combatant.max_hp();
    let mut stats = combatant.stats;
    let mut restrictions = TurnRestrictions::empty();
    let mut hp = combatant.current_hp;

    for effect in combatant.status_effects.iter_mut() {
        if let Some(def) = statuses.definition(effect.kind) {
            if let Some(fraction) = def.damage_per_turn {
                let amount = fraction_of(max_hp, fraction);
                let lost = amount.min(hp);
                hp -= lost;
                log.push(format!(
                    "{} takes {} damage from {}.",
                    combatant.name, lost, def.name
                ));
            }
            if let Some(fraction) = def.heal_per_turn {
                let amount = fraction_of(max_hp, fraction);
                let healed = amount.min(max_hp.saturating_sub(hp));
                hp += healed;
                log.push(format!(
                    "{} recovers {} HP from {}.",
                    combatant.name, healed, def.name
                ));
            }

            for modifier in def.stat_buff.iter().chain(def.stat_debuff.iter()) {
                stats.scale(modifier.stat, modifier.multiplier);
            }

            if def.skip_turn {
                restrictions |= TurnRestrictions::CANNOT_ACT;
            }

            if let Some(rule) = def.stacking {
                let stacks = effect.stacks.unwrap_or(1).min(rule.max_stacks);
                stats.scale(rule.stat, 1.0 + rule.multiplier_per_turn * f64::from(stacks));
                effect.stacks = Some((stacks + 1).min(rule.max_stacks));
            }

            if def.disables_skills {
                restrictions |= TurnRestrictions::SKILLS_DISABLED;
            }
        } else {
            tracing::trace!(kind = %effect.kind, "status without definition");
        }

        effect.turns_remaining = effect.turns_remaining.saturating_sub(1);
    }

    combatant.current_hp = hp;

    for expired in combatant.status_effects.remove_expired() {
        log.push(format!(
            "{} recovered from {}.",
            combatant.name,
            display_name(statuses, expired.kind)
        ));
    }

    StatusTick {
        stats,
        restrictions,
    }
}

/// Applies a status to `target` using the catalog's default duration and
/// stacking rule.
///
/// Returns `false` when the kind is missing from the catalog.
pub fn apply_status(
    target: &mut Combatant,
    kind: StatusKind,
    duration: Option<u32>,
    statuses: &(impl StatusOracle + ?Sized),
) -> bool {
    let Some(def) = statuses.definition(kind) else {
        return false;
    };
    let duration = duration.unwrap_or(def.duration);
    target
        .status_effects
        .apply(kind, duration, def.stacking.is_some());
    target.status_effects.has(kind)
}

fn fraction_of(max_hp: u32, fraction: f64) -> u32 {
    if !fraction.is_finite() || fraction <= 0.0 {
        return 0;
    }
    (f64::from(max_hp) * fraction)
        .floor()
        .min(f64::from(u32::MAX)) as u32
}

fn display_name(statuses: &(impl StatusOracle + ?Sized), kind: StatusKind) -> String {
    statuses
        .definition(kind)
        .map(|def| def.name)
        .unwrap_or_else(|| kind.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::StandardStatuses;
    use crate::state::{CreatureType, StatusEffectInstance, StatusEffects};

    fn target() -> Combatant {
        Combatant::new("Target", CreatureType::Beast, Stats::new(100, 20.0, 10.0, 10.0))
    }

    #[test]
    fn burn_deals_damage_and_expires_on_zero() {
        let mut c = target();
        apply_status(&mut c, StatusKind::Burn, Some(2), &StandardStatuses);
        let mut log = CombatLog::new();

        tick_status_effects(&mut c, &StandardStatuses, &mut log);
        assert_eq!(c.current_hp, 94);
        assert_eq!(c.status_effects.get(StatusKind::Burn).map(|e| e.turns_remaining), Some(1));

        tick_status_effects(&mut c, &StandardStatuses, &mut log);
        assert_eq!(c.current_hp, 88);
        assert!(!c.status_effects.has(StatusKind::Burn));
        assert!(log.lines().iter().any(|l| l.contains("recovered")));
    }

    #[test]
    fn stun_prevents_acting_for_one_round() {
        let mut c = target();
        apply_status(&mut c, StatusKind::Stun, None, &StandardStatuses);
        let mut log = CombatLog::new();

        let tick = tick_status_effects(&mut c, &StandardStatuses, &mut log);
        assert!(!tick.can_act());
        let tick = tick_status_effects(&mut c, &StandardStatuses, &mut log);
        assert!(tick.can_act());
    }

    #[test]
    fn stat_modifiers_do_not_touch_base_stats() {
        let mut c = target();
        apply_status(&mut c, StatusKind::Rage, None, &StandardStatuses);
        let tick = tick_status_effects(&mut c, &StandardStatuses, &mut CombatLog::new());
        assert!((tick.stats.atk - 26.0).abs() < 1e-9);
        assert_eq!(c.stats.atk, 20.0);
    }

    #[test]
    fn curse_grows_and_caps() {
        let mut c = target();
        c.status_effects = StatusEffects::from_iter([StatusEffectInstance {
            stacks: Some(1),
            ..StatusEffectInstance::new(StatusKind::Curse, 10)
        }]);
        let mut log = CombatLog::new();

        let first = tick_status_effects(&mut c, &StandardStatuses, &mut log);
        assert!((first.stats.atk - 18.0).abs() < 1e-9);
        for _ in 0..8 {
            tick_status_effects(&mut c, &StandardStatuses, &mut log);
        }
        assert_eq!(c.status_effects.get(StatusKind::Curse).and_then(|e| e.stacks), Some(5));
    }

    #[test]
    fn silence_disables_skills() {
        let mut c = target();
        apply_status(&mut c, StatusKind::Silence, None, &StandardStatuses);
        let tick = tick_status_effects(&mut c, &StandardStatuses, &mut CombatLog::new());
        assert!(tick.skills_disabled());
        assert!(tick.can_act());
    }
}
