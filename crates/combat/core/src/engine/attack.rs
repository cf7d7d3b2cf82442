//! Attack pipeline.
//!
//! One call resolves one attacker action against one defender:
//!
//! 1. Defender evasive skills (paradox loop, divine protection, dodge).
//! 2. Hit check.
//! 3. Attacker attack-replacing skills; the first that fires wins. An
//!    execute replaces steps 4-5 with the target's remaining HP.
//! 4. Damage: formula, resonance, lich form, skill multipliers, then the
//!    flat weapon proc bonus.
//! 5. Mitigation: damage reduction, barriers, defensive equipment.
//! 6. Side effects: status infliction, healing, reflection, counters. These
//!    run for every landed hit, executes included.
//!
//! A failure inside steps 4-5 degrades the hit to `min_damage`; it never
//! aborts the battle.

use crate::combat::{
    AttackError, CombatLog, DamageInput, DefensiveOutcome, OffensiveOutcome, WeaponProcOutcome,
    apply_status, calculate_damage, check_crit, check_hit, process_defensive, process_offensive,
    roll_weapon_proc,
};
use crate::combat::damage::finite_damage;
use crate::combat::hit::with_bonus;
use crate::env::{FixedRandom, RandomSource, StatusOracle};
use crate::error::CombatError;
use crate::skills::{ActivationEffect, HpContext, LICH_DRAIN, LICH_MULTIPLIER, SkillKind, check_activation};
use crate::state::StatusKind;

use super::battle::{Fighter, Rules};

/// Default cap on resonance stacks when the skill does not set one.
const DEFAULT_RESONANCE_MAX_STACKS: u32 = 5;
/// Upper bound on skill damage reduction.
const MAX_DAMAGE_REDUCTION: f64 = 0.9;
/// Roll that fails every probabilistic check; used for silent previews.
const NEVER_ROLL: f64 = 0.999_999;

/// Damage dealt by one strike before mitigation.
struct Strike {
    /// Formula damage, excluding the weapon proc bonus.
    damage: f64,
    critical: bool,
    weapon_proc: Option<WeaponProcOutcome>,
}

impl Strike {
    fn proc_bonus(&self) -> f64 {
        self.weapon_proc.map_or(0.0, |p| p.bonus_damage)
    }
}

/// Result of the attack-replacing skill check.
#[derive(Clone, Copy)]
enum Replacement {
    /// The target is slain outright; no damage roll.
    Execute,
    Strike(Empowerment),
}

/// Attack-replacing activation state carried into the damage step.
#[derive(Clone, Copy)]
struct Empowerment {
    multiplier: f64,
    drain: f64,
}

impl Default for Empowerment {
    fn default() -> Self {
        Self {
            multiplier: 1.0,
            drain: 0.0,
        }
    }
}

/// Landed hit after mitigation.
#[derive(Default)]
struct Hit {
    damage: u32,
    critical: bool,
    weapon_proc: Option<WeaponProcOutcome>,
    echo: u32,
    defensive: Vec<DefensiveOutcome>,
}

pub(super) fn resolve_attack(
    rules: &Rules<'_>,
    attacker: &mut Fighter,
    defender: &mut Fighter,
    log: &mut CombatLog,
    rng: &mut dyn RandomSource,
) {
    if defender_evades(rules, attacker, defender, log, rng) {
        return;
    }

    let config = rules.config;
    let accuracy = with_bonus(attacker.tick.stats.accuracy, attacker.effects.accuracy_bonus);
    let evasion = with_bonus(defender.tick.stats.evasion, defender.effects.dodge_bonus);
    if !check_hit(accuracy, evasion, config, rng) {
        log.push(format!("{} attacks but misses {}!", attacker.name(), defender.name()));
        return;
    }

    let (empowerment, hit) = match attack_replacement(attacker, defender, log, rules, rng) {
        Replacement::Execute => {
            let hit = Hit {
                damage: defender.combatant.current_hp,
                ..Hit::default()
            };
            let lost = defender.combatant.take_damage(hit.damage);
            log.push(format!("{} is struck down for {} damage!", defender.name(), lost));
            after_hit(rules, attacker, defender, &hit, lost, Empowerment::default(), log, rng);
            return;
        }
        Replacement::Strike(empowerment) => {
            (empowerment, land_hit(rules, attacker, defender, empowerment, log, rng))
        }
    };

    let hit = match hit {
        Ok(hit) => hit,
        Err(error) => {
            tracing::debug!(
                code = error.error_code(),
                %error,
                attacker = attacker.name(),
                "attack degraded to minimum damage"
            );
            log.push(format!(
                "{}'s attack falters and deals minimal damage.",
                attacker.name()
            ));
            Hit {
                damage: config.min_damage,
                ..Hit::default()
            }
        }
    };

    let lost = defender.combatant.take_damage(hit.damage);
    let crit = if hit.critical { " Critical hit!" } else { "" };
    log.push(format!(
        "{} hits {} for {} damage.{}",
        attacker.name(),
        defender.name(),
        lost,
        crit
    ));

    after_hit(rules, attacker, defender, &hit, lost, empowerment, log, rng);
}

/// Step 1. Returns `true` when the attack is negated.
fn defender_evades(
    rules: &Rules<'_>,
    attacker: &Fighter,
    defender: &mut Fighter,
    log: &mut CombatLog,
    rng: &mut dyn RandomSource,
) -> bool {
    if !defender.skills_enabled() {
        return false;
    }

    for kind in SkillKind::EVASIVE {
        let Some(activation) =
            check_activation(&defender.combatant, kind, HpContext::default(), rules.config, rng)
        else {
            continue;
        };
        log.push(activation.message);

        if let ActivationEffect::Paradox { recoil } = activation.effect {
            let preview = preview_damage(rules, attacker, defender);
            let stored = (f64::from(preview) * recoil).floor().max(0.0) as u32;
            let counters = &mut defender.combatant.counters;
            counters.paradox_stored = counters.paradox_stored.saturating_add(stored);
            log.push(format!(
                "{} is untouched and holds {} damage for the next turn.",
                defender.name(),
                stored
            ));
        }
        return true;
    }
    false
}

/// Log-free, roll-free strike used to size a paradox loop.
fn preview_damage(rules: &Rules<'_>, attacker: &Fighter, defender: &Fighter) -> u32 {
    let mut silent = CombatLog::muted();
    strike(rules, attacker, defender, &mut silent, &mut FixedRandom(NEVER_ROLL))
        .and_then(|s| finite_damage(s.damage + s.proc_bonus(), "paradox preview", rules.config))
        .unwrap_or(rules.config.min_damage)
}

/// Step 3.
fn attack_replacement(
    attacker: &mut Fighter,
    defender: &Fighter,
    log: &mut CombatLog,
    rules: &Rules<'_>,
    rng: &mut dyn RandomSource,
) -> Replacement {
    let mut empowerment = Empowerment::default();
    if !attacker.skills_enabled() {
        return Replacement::Strike(empowerment);
    }

    for kind in SkillKind::EXCLUSIVE {
        let hp = if kind == SkillKind::Execute {
            defender.hp_context()
        } else {
            attacker.hp_context()
        };
        let Some(activation) = check_activation(&attacker.combatant, kind, hp, rules.config, rng)
        else {
            continue;
        };
        log.push(activation.message);

        match activation.effect {
            ActivationEffect::Execute => return Replacement::Execute,
            ActivationEffect::Empower {
                multiplier,
                hp_cost,
                drain,
            } => {
                let affordable = attacker.combatant.current_hp.saturating_sub(1);
                attacker.combatant.take_damage(hp_cost.min(affordable));
                empowerment = Empowerment { multiplier, drain };
            }
            ActivationEffect::Transform { turns } => {
                attacker.combatant.counters.lich_turns = turns;
            }
            _ => {}
        }
        break;
    }
    Replacement::Strike(empowerment)
}

/// Step 4 for one strike.
fn strike(
    rules: &Rules<'_>,
    attacker: &Fighter,
    defender: &Fighter,
    log: &mut CombatLog,
    rng: &mut dyn RandomSource,
) -> Result<Strike, AttackError> {
    let config = rules.config;
    let critical = check_crit(attacker.tick.stats.luck, attacker.effects.crit_bonus, config, rng);
    let input = DamageInput {
        attacker: &attacker.tick.stats,
        attacker_type: attacker.combatant.creature_type,
        defender: &defender.tick.stats,
        defender_type: defender.combatant.creature_type,
        defender_resistances: &defender.effects.resistances,
        damage_bonus: attacker.effects.damage_bonuses.total(),
        is_critical: critical,
    };
    let mut damage = f64::from(calculate_damage(&input, config)?);

    let bonuses = &attacker.combatant.skill_bonuses;
    let stacks = attacker.combatant.counters.resonance_stacks;
    if let Some(per_stack) = bonuses.resonance_per_stack.filter(|_| stacks > 0) {
        damage *= checked_multiplier("resonance", 1.0 + per_stack * f64::from(stacks))?;
    }
    if attacker.combatant.counters.lich_turns > 0 {
        damage *= LICH_MULTIPLIER;
    }

    let weapon_proc = roll_weapon_proc(&attacker.effects, attacker.tick.stats.atk, rng);
    if let Some(outcome) = weapon_proc {
        log.push(format!("{}'s {} activates!", attacker.name(), outcome.ability));
    }

    Ok(Strike {
        damage,
        critical,
        weapon_proc,
    })
}

/// Steps 4-5.
fn land_hit(
    rules: &Rules<'_>,
    attacker: &Fighter,
    defender: &Fighter,
    empowerment: Empowerment,
    log: &mut CombatLog,
    rng: &mut dyn RandomSource,
) -> Result<Hit, AttackError> {
    let config = rules.config;
    let strike = strike(rules, attacker, defender, log, rng)?;
    let mut damage = strike.damage * checked_multiplier("empowerment", empowerment.multiplier)?
        + strike.proc_bonus();

    let mut echo_multiplier = None;
    if attacker.skills_enabled() {
        let hp = attacker.hp_context();
        for kind in [SkillKind::ChainReaction, SkillKind::MultiAttack, SkillKind::TemporalEcho] {
            let Some(activation) = check_activation(&attacker.combatant, kind, hp, config, rng)
            else {
                continue;
            };
            log.push(activation.message);
            match activation.effect {
                ActivationEffect::Chain { multiplier } => {
                    damage += strike.damage * checked_multiplier("chain reaction", multiplier)?;
                }
                ActivationEffect::ExtraHits { hits, multiplier } => {
                    let multiplier = checked_multiplier("multi attack", multiplier)?;
                    damage += strike.damage * multiplier * f64::from(hits);
                }
                ActivationEffect::Echo { multiplier } => {
                    echo_multiplier = Some(checked_multiplier("temporal echo", multiplier)?);
                }
                _ => {}
            }
        }
    }

    if let Some(reduction) = defender.combatant.skill_bonuses.damage_reduction {
        damage *= 1.0 - reduction.clamp(0.0, MAX_DAMAGE_REDUCTION);
    }

    if defender.skills_enabled() {
        for kind in SkillKind::BARRIERS {
            let activation =
                check_activation(&defender.combatant, kind, HpContext::default(), config, rng);
            if let Some(activation) = activation {
                if let ActivationEffect::Barrier { reduction } = activation.effect {
                    damage *= 1.0 - reduction.clamp(0.0, 1.0);
                    log.push(activation.message);
                }
            }
        }
    }

    let incoming = finite_damage(damage, "skill multipliers", config)?;
    let mut defensive = Vec::new();
    for (effect, outcome) in process_defensive(&defender.effects, incoming, rng) {
        if let DefensiveOutcome::Block(amount) = outcome {
            damage -= f64::from(amount);
            log.push(format!("{}'s {} blocks {} damage!", defender.name(), effect, amount));
        }
        defensive.push(outcome);
    }

    let damage = finite_damage(damage, "mitigation", config)?;
    let echo = match echo_multiplier {
        Some(multiplier) => finite_damage(f64::from(damage) * multiplier, "temporal echo", config)?,
        None => 0,
    };

    Ok(Hit {
        damage,
        critical: strike.critical,
        weapon_proc: strike.weapon_proc,
        echo,
        defensive,
    })
}

/// Step 6.
#[allow(clippy::too_many_arguments)]
fn after_hit(
    rules: &Rules<'_>,
    attacker: &mut Fighter,
    defender: &mut Fighter,
    hit: &Hit,
    lost: u32,
    empowerment: Empowerment,
    log: &mut CombatLog,
    rng: &mut dyn RandomSource,
) {
    let config = rules.config;
    let statuses = rules.statuses;

    if hit.echo > 0 && defender.combatant.is_alive() {
        let echoed = defender.combatant.take_damage(hit.echo);
        log.push(format!("The echo deals {} more damage to {}.", echoed, defender.name()));
    }

    if let Some(kind) = hit.weapon_proc.and_then(|p| p.inflicts) {
        inflict(defender, kind, statuses, log);
    }

    let mut healing = 0u32;
    if attacker.skills_enabled() {
        let hp = attacker.hp_context();
        if let Some(activation) = check_activation(&attacker.combatant, SkillKind::Lifesteal, hp, config, rng) {
            if let ActivationEffect::Lifesteal { percent } = activation.effect {
                log.push(activation.message);
                healing = healing.saturating_add(portion(lost, percent));
            }
        }
    }
    if attacker.combatant.counters.lich_turns > 0 {
        healing = healing.saturating_add(portion(lost, LICH_DRAIN));
    }
    healing = healing.saturating_add(portion(lost, empowerment.drain));

    for (effect, outcome) in process_offensive(&attacker.effects, lost, rng) {
        match outcome {
            OffensiveOutcome::Inflict(kind) => {
                log.push(format!("{}'s {} takes hold!", attacker.name(), effect));
                inflict(defender, kind, statuses, log);
            }
            OffensiveOutcome::Heal(amount) => healing = healing.saturating_add(amount),
        }
    }

    if healing > 0 {
        let healed = attacker.combatant.heal(healing);
        if healed > 0 {
            log.push(format!("{} recovers {} HP.", attacker.name(), healed));
        }
    }

    if attacker.skills_enabled() {
        let bonuses = &attacker.combatant.skill_bonuses;
        if let Some(kind) = bonuses.inflict_status {
            if bonuses.inflict_chance.is_some_and(|p| rng.chance(p)) {
                inflict(defender, kind, statuses, log);
            }
        }
    }

    let bonuses = &attacker.combatant.skill_bonuses;
    if bonuses.resonance_per_stack.is_some() {
        let cap = bonuses
            .resonance_max_stacks
            .unwrap_or(DEFAULT_RESONANCE_MAX_STACKS);
        let counters = &mut attacker.combatant.counters;
        counters.resonance_stacks = (counters.resonance_stacks + 1).min(cap);
    }

    for outcome in &hit.defensive {
        match *outcome {
            DefensiveOutcome::Reflect(amount) if amount > 0 => {
                let reflected = attacker.combatant.take_damage(amount);
                log.push(format!(
                    "{} takes {} damage from {}'s thorns.",
                    attacker.name(),
                    reflected,
                    defender.name()
                ));
            }
            DefensiveOutcome::BurnAttacker => inflict(attacker, StatusKind::Burn, statuses, log),
            DefensiveOutcome::Fortify => inflict(defender, StatusKind::Fortify, statuses, log),
            DefensiveOutcome::Reflect(_) | DefensiveOutcome::Block(_) => {}
        }
    }

    if defender.combatant.is_alive() && attacker.combatant.is_alive() && defender.skills_enabled() {
        let hp = defender.hp_context();
        if let Some(activation) = check_activation(&defender.combatant, SkillKind::Counter, hp, config, rng) {
            if let ActivationEffect::Counter { multiplier } = activation.effect {
                log.push(activation.message);
                let amount = (defender.tick.stats.atk * multiplier).floor();
                let amount = if amount.is_finite() && amount >= 1.0 {
                    amount.min(f64::from(u32::MAX)) as u32
                } else {
                    1
                };
                let countered = attacker.combatant.take_damage(amount);
                log.push(format!(
                    "{} takes {} counter damage.",
                    attacker.name(),
                    countered
                ));
            }
        }
    }
}

fn inflict(
    target: &mut Fighter,
    kind: StatusKind,
    statuses: &(dyn StatusOracle + '_),
    log: &mut CombatLog,
) {
    if apply_status(&mut target.combatant, kind, None, statuses) {
        log.push(format!("{} is afflicted with {}!", target.name(), kind));
    }
}

fn portion(amount: u32, fraction: f64) -> u32 {
    if !fraction.is_finite() || fraction <= 0.0 {
        return 0;
    }
    (f64::from(amount) * fraction).floor().min(f64::from(u32::MAX)) as u32
}

fn checked_multiplier(source: &str, value: f64) -> Result<f64, AttackError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(AttackError::InvalidMultiplier {
            source_name: source.to_string(),
            value,
        })
    }
}
