use std::collections::HashMap;

use combat_core::{
    BattleEngine, BattleEntrant, BattleMode, BattleOutcome, BattleRequest, CombatConfig, CombatEnv,
    Combatant, CreatureType, DrawPolicy, Equipment, FixedRandom, ItemDefinition, ItemId,
    ItemOracle, ItemSpecial, PcgRandom, Side, SkillBonuses, SkillDefinition, SkillId,
    SkillOracle, SkillTree, Stats, StatusKind, StatusEffects,
};

struct Items(HashMap<ItemId, ItemDefinition>);

impl ItemOracle for Items {
    fn definition(&self, id: &ItemId) -> Option<ItemDefinition> {
        self.0.get(id).cloned()
    }

    fn all_definitions(&self) -> Vec<ItemDefinition> {
        self.0.values().cloned().collect()
    }
}

struct Skills(Vec<SkillDefinition>);

impl SkillOracle for Skills {
    fn skill(&self, creature_type: CreatureType, id: &SkillId) -> Option<SkillDefinition> {
        self.0
            .iter()
            .find(|s| s.creature_type == creature_type && &s.id == id)
            .cloned()
    }

    fn skills_for(&self, creature_type: CreatureType) -> Vec<SkillDefinition> {
        self.0
            .iter()
            .filter(|s| s.creature_type == creature_type)
            .cloned()
            .collect()
    }
}

fn wolf() -> Combatant {
    Combatant::new("Wolf", CreatureType::Beast, Stats::new(100, 40.0, 0.0, 10.0))
}

fn sage() -> Combatant {
    Combatant::new("Sage", CreatureType::Mystic, Stats::new(100, 10.0, 20.0, 10.0))
}

fn twin(name: &str) -> Combatant {
    Combatant::new(name, CreatureType::Beast, Stats::new(1_000, 10.0, 10.0, 10.0))
}

#[test]
fn stronger_challenger_wins() {
    let config = CombatConfig::default();
    let engine = BattleEngine::new(CombatEnv::standard(), &config);
    let request = BattleRequest::new(wolf(), sage());

    let result = engine.simulate(&request, &mut FixedRandom(0.5));

    assert_eq!(result.outcome, BattleOutcome::Victory);
    assert!(result.player_won);
    assert_eq!(result.winner, Some(Side::Challenger));
    assert_eq!(result.winner_name(), Some("Wolf"));
    assert_eq!(result.loser_name(), Some("Sage"));
    assert_eq!(result.opponent.current_hp, 0);
    assert_eq!(result.remaining_hp, result.challenger.current_hp);
    assert!(result.log.iter().any(|line| line == "--- Turn 1 ---"));
    assert!(result.log.iter().any(|line| line.contains("hits Sage for 45 damage")));
}

#[test]
fn stalemate_draws_with_first_combatant_as_nominal_winner() {
    let config = CombatConfig::default();
    let engine = BattleEngine::new(CombatEnv::standard(), &config);
    let request = BattleRequest::new(twin("Left"), twin("Right"));

    let result = engine.simulate(&request, &mut FixedRandom(0.5));

    assert_eq!(result.outcome, BattleOutcome::Draw);
    assert_eq!(result.turns, 50);
    assert_eq!(result.winner, Some(Side::Challenger));
    assert!(result.player_won);
    assert!(result.challenger.current_hp > 0);
    assert!(result.opponent.current_hp > 0);
}

#[test]
fn stalemate_without_winner_when_configured() {
    let config = CombatConfig::default()
        .with_max_turns(10)
        .with_draw_policy(DrawPolicy::NoWinner);
    let engine = BattleEngine::new(CombatEnv::standard(), &config);
    let request = BattleRequest::new(twin("Left"), twin("Right"));

    let result = engine.simulate(&request, &mut FixedRandom(0.5));

    assert_eq!(result.outcome, BattleOutcome::Draw);
    assert_eq!(result.turns, 10);
    assert_eq!(result.winner, None);
    assert_eq!(result.loser, None);
    assert!(!result.player_won);
}

#[test]
fn fainted_challenger_loses_before_the_first_round() {
    let config = CombatConfig::default();
    let engine = BattleEngine::new(CombatEnv::standard(), &config);
    let request = BattleRequest::new(wolf().with_current_hp(0), sage());

    let result = engine.simulate(&request, &mut FixedRandom(0.5));

    assert_eq!(result.outcome, BattleOutcome::Defeat);
    assert_eq!(result.turns, 0);
    assert!(!result.player_won);
}

#[test]
fn missing_item_catalog_is_a_simulation_error() {
    let config = CombatConfig::default();
    let engine = BattleEngine::new(CombatEnv::standard(), &config);
    let armed = wolf().with_equipment(Equipment::builder().weapon("ember_blade").build());
    let request = BattleRequest::new(armed, sage());

    let result = engine.simulate(&request, &mut FixedRandom(0.5));

    assert!(result.is_error());
    assert_eq!(result.winner, Some(Side::Opponent));
    assert!(!result.player_won);
    assert!(result.error.is_some());
    assert!(engine.try_simulate(&request, &mut FixedRandom(0.5)).is_err());
}

#[test]
fn caller_records_are_never_mutated() {
    let config = CombatConfig::default();
    let engine = BattleEngine::new(CombatEnv::standard(), &config);
    let request = BattleRequest::new(wolf(), sage());
    let before = request.clone();

    let _ = engine.simulate(&request, &mut PcgRandom::new(7));

    assert_eq!(request, before);
}

#[test]
fn same_seed_replays_identically() {
    let config = CombatConfig::default();
    let engine = BattleEngine::new(CombatEnv::standard(), &config);
    let request = BattleRequest::new(
        wolf(),
        Combatant::new("Golem", CreatureType::Mechanical, Stats::new(150, 25.0, 15.0, 9.0)),
    );

    let first = engine.simulate(&request, &mut PcgRandom::new(42));
    let second = engine.simulate(&request, &mut PcgRandom::new(42));

    assert_eq!(first, second);
}

#[test]
fn independent_battles_run_concurrently() {
    let config = CombatConfig::default();
    let request = BattleRequest::new(
        wolf(),
        Combatant::new("Golem", CreatureType::Mechanical, Stats::new(150, 25.0, 15.0, 9.0)),
    );
    let expected: Vec<_> = (0..4)
        .map(|seed| {
            BattleEngine::new(CombatEnv::standard(), &config)
                .simulate(&request, &mut PcgRandom::new(seed))
        })
        .collect();

    let parallel: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|seed| {
                let (config, request) = (&config, &request);
                scope.spawn(move || {
                    BattleEngine::new(CombatEnv::standard(), config)
                        .simulate(request, &mut PcgRandom::new(seed))
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("battle thread panicked"))
            .collect()
    });

    assert_eq!(parallel, expected);
}

#[test]
fn phoenix_charm_revives_once() {
    let charm = ItemDefinition::new("phoenix_charm", "Phoenix Charm")
        .with_special(ItemSpecial::ReviveOnce);
    let items = Items(HashMap::from([(charm.id.clone(), charm)]));
    let config = CombatConfig::default();
    let env = CombatEnv::standard().with_items(&items);
    let engine = BattleEngine::new(env, &config);

    let fragile = sage().with_equipment(Equipment::builder().accessory("phoenix_charm").build());
    let result = engine.simulate(&BattleRequest::new(fragile, wolf()), &mut FixedRandom(0.5));

    assert_eq!(result.outcome, BattleOutcome::Defeat);
    let revivals = result.log.iter().filter(|l| l.contains("relic flares")).count();
    assert_eq!(revivals, 1);
}

#[test]
fn burning_combatant_enters_with_its_status() {
    let config = CombatConfig::default();
    let engine = BattleEngine::new(CombatEnv::standard(), &config);
    let mut effects = StatusEffects::empty();
    effects.apply(StatusKind::Burn, 2, false);
    let request = BattleRequest::new(twin("Ember").with_status_effects(effects), twin("Stone"))
        .with_mode(BattleMode::Duel);

    let result = engine.simulate(&request, &mut FixedRandom(0.5));

    assert!(result.log.iter().any(|l| l.contains("damage from burn")));
    assert!(result.log.iter().any(|l| l.contains("recovered from burn")));
    assert!(result.challenger.status_effects.is_empty());
}

#[test]
fn skill_tree_dodge_negates_every_attack() {
    let evasion = SkillDefinition::new("phase_step", "Phase Step", CreatureType::Mystic).level(
        SkillBonuses {
            dodge_chance: Some(1.0),
            ..SkillBonuses::default()
        },
    );
    let skills = Skills(vec![evasion]);
    let config = CombatConfig::default().with_max_turns(5);
    let env = CombatEnv::standard().with_skills(&skills);
    let engine = BattleEngine::new(env, &config);

    let dodger = BattleEntrant::new(sage()).with_skill_tree(SkillTree::new().with_skill("phase_step", 1));
    let request = BattleRequest::new(wolf(), dodger);
    let result = engine.simulate(&request, &mut FixedRandom(0.5));

    assert_eq!(result.opponent.current_hp, 100);
    assert_eq!(result.log.iter().filter(|l| l.contains("dodges")).count(), 5);
}
