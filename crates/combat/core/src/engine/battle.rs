//! Round loop and battle-local state.

use crate::combat::{
    BattleOutcome, BattleResult, CombatLog, CombatantSummary, EffectMap, StatusTick,
    TurnRestrictions, effective_speed, first_actor, resolve_combatant_effects,
    tick_status_effects,
};
use crate::config::{CombatConfig, DrawPolicy};
use crate::env::{CombatEnv, RandomSource, StatusOracle};
use crate::skills::{ActivationEffect, HpContext, SkillKind, apply_bonuses, check_activation};
use crate::state::{BattleCounters, Combatant, Side, StatDeltas, StatKind};

use super::attack::resolve_attack;
use super::death::resolve_death;
use super::{BattleEntrant, BattleError, BattleRequest};

const SIDES: [Side; 2] = [Side::Challenger, Side::Opponent];

/// Read-only inputs shared by every step of one battle.
#[derive(Clone, Copy)]
pub(super) struct Rules<'e> {
    pub statuses: &'e (dyn StatusOracle + 'e),
    pub config: &'e CombatConfig,
}

/// One side's working state.
#[derive(Clone, Debug)]
pub(super) struct Fighter {
    pub combatant: Combatant,
    pub effects: EffectMap,
    /// Status tick of the current round.
    pub tick: StatusTick,
}

impl Fighter {
    fn new(combatant: Combatant, effects: EffectMap) -> Self {
        let tick = StatusTick {
            stats: combatant.stats,
            restrictions: TurnRestrictions::empty(),
        };
        Self {
            combatant,
            effects,
            tick,
        }
    }

    pub fn skills_enabled(&self) -> bool {
        !self.tick.skills_disabled()
    }

    pub fn hp_context(&self) -> HpContext {
        HpContext::new(self.combatant.current_hp, self.combatant.max_hp())
    }

    pub fn name(&self) -> &str {
        &self.combatant.name
    }
}

/// Splits the pair into `(side, side.other())`.
pub(super) fn pair_mut(fighters: &mut [Fighter; 2], side: Side) -> (&mut Fighter, &mut Fighter) {
    let [challenger, opponent] = fighters;
    match side {
        Side::Challenger => (challenger, opponent),
        Side::Opponent => (opponent, challenger),
    }
}

pub(super) struct Battle<'e> {
    rules: Rules<'e>,
    fighters: [Fighter; 2],
    log: CombatLog,
    round: u32,
}

impl<'e> Battle<'e> {
    /// Builds battle-local fighters from the request.
    ///
    /// The item oracle is only required when a side has equipment, and the
    /// skill oracle only when a side has unlocked skills.
    pub fn prepare(
        request: &BattleRequest,
        env: &CombatEnv<'e>,
        config: &'e CombatConfig,
    ) -> Result<Self, BattleError> {
        let rules = Rules {
            statuses: env.statuses()?,
            config,
        };
        let challenger = prepare_fighter(&request.challenger, request, env, config)?;
        let opponent = prepare_fighter(&request.opponent, request, env, config)?;

        Ok(Self {
            rules,
            fighters: [challenger, opponent],
            log: CombatLog::new(),
            round: 0,
        })
    }

    pub fn run(mut self, rng: &mut dyn RandomSource) -> Result<BattleResult, BattleError> {
        self.log.push(format!(
            "{} ({}) vs {} ({})",
            self.fighters[0].name(),
            self.fighters[0].combatant.creature_type,
            self.fighters[1].name(),
            self.fighters[1].combatant.creature_type,
        ));

        if let Some(loser) = SIDES.into_iter().find(|side| !self.fighter(*side).combatant.is_alive()) {
            self.log
                .push(format!("{} is unable to battle!", self.fighter(loser).name()));
            return Ok(self.finish_decisive(loser));
        }

        while self.round < self.rules.config.max_turns {
            self.round += 1;
            if let Some(loser) = self.play_round(rng) {
                return Ok(self.finish_decisive(loser));
            }
            self.check_invariants()?;
        }

        Ok(self.finish_draw())
    }

    /// Plays one round. Returns the defeated side, if any.
    fn play_round(&mut self, rng: &mut dyn RandomSource) -> Option<Side> {
        self.log.push(format!("--- Turn {} ---", self.round));

        for side in SIDES {
            self.tick(side);
        }
        self.reflect_paradox();
        if let Some(loser) = self.resolve_deaths(rng) {
            return Some(loser);
        }

        let config = self.rules.config;
        let speed = |fighter: &Fighter| {
            effective_speed(fighter.tick.stats.spd, &fighter.combatant.status_effects, config)
        };
        let first = first_actor(speed(&self.fighters[0]), speed(&self.fighters[1]), rng);

        for side in [first, first.other()] {
            let (attacker, defender) = pair_mut(&mut self.fighters, side);
            if !attacker.combatant.is_alive() || !defender.combatant.is_alive() {
                break;
            }
            if !attacker.tick.can_act() {
                self.log
                    .push(format!("{} is unable to act!", attacker.name()));
                continue;
            }
            resolve_attack(&self.rules, attacker, defender, &mut self.log, rng);
            if let Some(loser) = self.resolve_deaths(rng) {
                return Some(loser);
            }
        }

        self.end_of_round(rng);
        None
    }

    fn fighter(&self, side: Side) -> &Fighter {
        &self.fighters[side.index()]
    }

    fn tick(&mut self, side: Side) {
        let fighter = &mut self.fighters[side.index()];
        fighter.tick = tick_status_effects(&mut fighter.combatant, self.rules.statuses, &mut self.log);
    }

    /// Deals damage stored by last round's paradox loops to the original
    /// attackers and clears it.
    fn reflect_paradox(&mut self) {
        for side in SIDES {
            let (owner, target) = pair_mut(&mut self.fighters, side);
            let stored = std::mem::take(&mut owner.combatant.counters.paradox_stored);
            if stored == 0 {
                continue;
            }
            let lost = target.combatant.take_damage(stored);
            self.log.push(format!(
                "The paradox loop of {} unravels: {} takes {} reflected damage!",
                owner.name(),
                target.name(),
                lost
            ));
            tracing::trace!(owner = owner.name(), stored, lost, "paradox reflected");
        }
    }

    /// Runs death handling for both sides, challenger first.
    fn resolve_deaths(&mut self, rng: &mut dyn RandomSource) -> Option<Side> {
        SIDES.into_iter().find(|side| {
            !resolve_death(
                &mut self.fighters[side.index()],
                self.rules.config,
                &mut self.log,
                rng,
            )
        })
    }

    fn end_of_round(&mut self, rng: &mut dyn RandomSource) {
        let config = self.rules.config;
        for fighter in &mut self.fighters {
            if !fighter.combatant.is_alive() {
                continue;
            }
            if fighter.skills_enabled() {
                for kind in [SkillKind::HpRegen, SkillKind::SelfRepair] {
                    let activation =
                        check_activation(&fighter.combatant, kind, fighter.hp_context(), config, rng);
                    if let Some(activation) = activation {
                        if let ActivationEffect::Heal { amount } = activation.effect {
                            fighter.combatant.heal(amount);
                            self.log.push(activation.message);
                        }
                    }
                }
            }

            let lich = &mut fighter.combatant.counters.lich_turns;
            if *lich > 0 {
                *lich -= 1;
                if *lich == 0 {
                    self.log
                        .push(format!("{} returns from lich form.", fighter.combatant.name));
                }
            }
        }
    }

    fn check_invariants(&self) -> Result<(), BattleError> {
        for fighter in &self.fighters {
            let combatant = &fighter.combatant;
            if combatant.current_hp > combatant.max_hp() {
                return Err(BattleError::InvariantViolated {
                    round: self.round,
                    detail: format!(
                        "{} has {} HP above max {}",
                        combatant.name,
                        combatant.current_hp,
                        combatant.max_hp()
                    ),
                });
            }
        }
        Ok(())
    }

    fn finish_decisive(mut self, loser: Side) -> BattleResult {
        let winner = loser.other();
        self.log
            .push(format!("{} wins the battle!", self.fighter(winner).name()));
        let outcome = match winner {
            Side::Challenger => BattleOutcome::Victory,
            Side::Opponent => BattleOutcome::Defeat,
        };
        self.into_result(outcome, Some(winner))
    }

    fn finish_draw(mut self) -> BattleResult {
        self.log.push(format!(
            "The battle ends in a draw after {} turns.",
            self.round
        ));
        let winner = match self.rules.config.draw_policy {
            DrawPolicy::FirstCombatantWins => Some(Side::Challenger),
            DrawPolicy::NoWinner => None,
        };
        self.into_result(BattleOutcome::Draw, winner)
    }

    fn into_result(self, outcome: BattleOutcome, winner: Option<Side>) -> BattleResult {
        let [challenger, opponent] = self.fighters;
        BattleResult {
            outcome,
            player_won: winner == Some(Side::Challenger),
            remaining_hp: challenger.combatant.current_hp,
            log: self.log.into_lines(),
            winner,
            loser: winner.map(Side::other),
            turns: self.round,
            challenger: CombatantSummary::from(&challenger.combatant),
            opponent: CombatantSummary::from(&opponent.combatant),
            error: None,
        }
    }
}

fn prepare_fighter(
    entrant: &BattleEntrant,
    request: &BattleRequest,
    env: &CombatEnv<'_>,
    config: &CombatConfig,
) -> Result<Fighter, BattleError> {
    let mut combatant = entrant.combatant.snapshot();
    combatant.counters = BattleCounters::default();

    let items = if combatant.equipment.is_empty() {
        None
    } else {
        Some(env.items()?)
    };
    let effects = resolve_combatant_effects(&combatant, items, config.equipment_bonus_stacking);
    apply_stat_deltas(&mut combatant, &effects.stats);

    if !entrant.skill_tree.unlocked.is_empty() {
        apply_bonuses(
            &mut combatant,
            &entrant.skill_tree,
            request.mode,
            entrant.party,
            env.skills()?,
        );
    }

    tracing::trace!(
        name = %combatant.name,
        hp = combatant.current_hp,
        atk = combatant.stats.atk,
        def = combatant.stats.def,
        "fighter prepared"
    );
    Ok(Fighter::new(combatant, effects))
}

/// Adds flat equipment deltas. A positive HP delta also raises current HP.
fn apply_stat_deltas(combatant: &mut Combatant, deltas: &StatDeltas) {
    let stats = &mut combatant.stats;
    stats.add(StatKind::Hp, deltas.hp);
    stats.add(StatKind::Atk, deltas.atk);
    stats.add(StatKind::Def, deltas.def);
    stats.add(StatKind::Spd, deltas.spd);
    stats.add(StatKind::Luck, deltas.luck);

    let gained = if deltas.hp.is_finite() && deltas.hp > 0.0 {
        deltas.hp.floor().min(f64::from(u32::MAX)) as u32
    } else {
        0
    };
    let hp = combatant.current_hp.saturating_add(gained);
    combatant.set_hp(hp);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{FixedRandom, STANDARD_STATUSES};
    use crate::state::{CreatureType, SkillBonuses, Stats};

    fn battle<'e>(request: &BattleRequest, config: &'e CombatConfig) -> Battle<'e> {
        Battle::prepare(request, &CombatEnv::standard(), config).expect("standard env prepares")
    }

    #[test]
    fn paradox_stores_then_reflects() {
        let config = CombatConfig::default();
        let attacker = Combatant::new("Fang", CreatureType::Beast, Stats::new(200, 50.0, 0.0, 10.0));
        let looper = Combatant::new("Oracle", CreatureType::Mystic, Stats::new(200, 10.0, 20.0, 10.0))
            .with_skill_bonuses(SkillBonuses {
                paradox_loop_chance: Some(1.0),
                recoil_percent: Some(0.5),
                ..SkillBonuses::default()
            });
        let request = BattleRequest::new(attacker, looper);
        let mut battle = battle(&request, &config);

        let (fang, oracle) = pair_mut(&mut battle.fighters, Side::Challenger);
        resolve_attack(&battle.rules, fang, oracle, &mut battle.log, &mut FixedRandom(0.5));

        assert_eq!(battle.fighters[1].combatant.current_hp, 200);
        assert_eq!(battle.fighters[1].combatant.counters.paradox_stored, 30);

        battle.reflect_paradox();
        assert_eq!(battle.fighters[0].combatant.current_hp, 170);
        assert_eq!(battle.fighters[1].combatant.counters.paradox_stored, 0);
    }

    #[test]
    fn end_of_round_regenerates_and_counts_down_lich() {
        let config = CombatConfig::default();
        let undead = Combatant::new("Wraith", CreatureType::Undead, Stats::new(100, 10.0, 5.0, 5.0))
            .with_current_hp(50)
            .with_skill_bonuses(SkillBonuses {
                hp_regen: Some(0.1),
                ..SkillBonuses::default()
            });
        let foe = Combatant::new("Gear", CreatureType::Mechanical, Stats::new(100, 10.0, 5.0, 5.0));
        let request = BattleRequest::new(undead, foe);
        let mut battle = battle(&request, &config);
        battle.fighters[0].combatant.counters.lich_turns = 1;

        battle.end_of_round(&mut FixedRandom(0.5));

        assert_eq!(battle.fighters[0].combatant.current_hp, 60);
        assert_eq!(battle.fighters[0].combatant.counters.lich_turns, 0);
        assert!(battle.log.lines().iter().any(|l| l.contains("lich form")));
    }

    #[test]
    fn self_repair_only_below_half_hp() {
        let config = CombatConfig::default();
        let golem = Combatant::new("Golem", CreatureType::Mechanical, Stats::new(100, 10.0, 5.0, 5.0))
            .with_current_hp(40)
            .with_skill_bonuses(SkillBonuses {
                self_repair: Some(0.2),
                ..SkillBonuses::default()
            });
        let foe = Combatant::new("Imp", CreatureType::Mystic, Stats::new(100, 10.0, 5.0, 5.0));
        let request = BattleRequest::new(golem, foe);
        let mut battle = battle(&request, &config);

        battle.end_of_round(&mut FixedRandom(0.5));
        assert_eq!(battle.fighters[0].combatant.current_hp, 60);
        assert!(battle.log.lines().iter().any(|l| l.contains("repairs itself for 20 HP")));

        battle.end_of_round(&mut FixedRandom(0.5));
        assert_eq!(battle.fighters[0].combatant.current_hp, 60);
    }

    #[test]
    fn equipment_hp_delta_raises_current_hp() {
        let mut c = Combatant::new("Golem", CreatureType::Mechanical, Stats::new(100, 10.0, 5.0, 5.0));
        apply_stat_deltas(
            &mut c,
            &StatDeltas {
                hp: 20.0,
                atk: -50.0,
                ..StatDeltas::default()
            },
        );
        assert_eq!(c.max_hp(), 120);
        assert_eq!(c.current_hp, 120);
        assert_eq!(c.stats.atk, 1.0);
    }

    #[test]
    fn statuses_oracle_is_required() {
        let config = CombatConfig::default();
        let a = Combatant::new("A", CreatureType::Beast, Stats::default());
        let b = Combatant::new("B", CreatureType::Beast, Stats::default());
        let request = BattleRequest::new(a, b);
        let env = CombatEnv::empty();
        assert!(matches!(
            Battle::prepare(&request, &env, &config),
            Err(BattleError::Oracle(_))
        ));
        let env = CombatEnv::empty().with_statuses(&STANDARD_STATUSES);
        assert!(Battle::prepare(&request, &env, &config).is_ok());
    }
}
