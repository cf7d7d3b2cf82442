use combat_content::ContentFactory;
use combat_core::{
    BattleEntrant, BattleOutcome, BattleRequest, CombatConfig, Combatant, CreatureType, Equipment,
    SkillTree, Stats, StatusEffects, StatusKind,
};
use combat_runtime::{
    BattleService, OracleManager, RuntimeConfig, RuntimeError, SessionStore, SessionConfig,
};

fn wolf() -> Combatant {
    Combatant::new("Wolf", CreatureType::Beast, Stats::new(100, 40.0, 0.0, 10.0))
}

fn golem() -> Combatant {
    Combatant::new("Golem", CreatureType::Mechanical, Stats::new(150, 25.0, 15.0, 9.0))
}

fn bundled_config(seed: u64) -> RuntimeConfig {
    RuntimeConfig {
        content_dir: Some(ContentFactory::bundled().data_dir().to_path_buf()),
        rng_seed: Some(seed),
        ..RuntimeConfig::default()
    }
}

#[tokio::test]
async fn builtin_catalogs_resolve_a_battle() {
    let service = BattleService::from_config(&RuntimeConfig::default()).expect("service builds");

    let result = service
        .run(BattleRequest::new(wolf(), golem()))
        .await
        .expect("battle runs");

    assert!(!result.is_error(), "{:?}", result.error);
    assert!(result.turns >= 1);
    assert_ne!(result.outcome, BattleOutcome::SimulationError);
}

#[tokio::test]
async fn fixed_seed_replays_across_services() {
    let first = BattleService::from_config(&bundled_config(7)).expect("service builds");
    let second = BattleService::from_config(&bundled_config(7)).expect("service builds");
    let request = BattleRequest::new(wolf(), golem());

    for _ in 0..3 {
        let a = first.run(request.clone()).await.expect("battle runs");
        let b = second.run(request.clone()).await.expect("battle runs");
        assert_eq!(a, b);
    }
}

#[tokio::test]
async fn concurrent_battles_match_sequential_ones() {
    let requests: Vec<_> = (0..6)
        .map(|i| {
            let challenger = wolf().with_current_hp(60 + i * 5);
            BattleRequest::new(challenger, golem())
        })
        .collect();

    let concurrent = BattleService::from_config(&bundled_config(99))
        .expect("service builds")
        .run_all(requests.clone())
        .await
        .expect("battles run");

    let sequential_service = BattleService::from_config(&bundled_config(99)).expect("service builds");
    let mut sequential = Vec::new();
    for request in requests {
        sequential.push(sequential_service.run(request).await.expect("battle runs"));
    }

    assert_eq!(concurrent, sequential);
}

#[tokio::test]
async fn bundled_items_and_skills_apply() {
    let service = BattleService::from_config(&bundled_config(3)).expect("service builds");
    let armored = golem().with_equipment(
        Equipment::builder()
            .weapon("storm_pike")
            .armor("iron_plate")
            .build(),
    );
    let entrant = BattleEntrant::new(armored)
        .with_skill_tree(SkillTree::new().with_skill("reinforced_frame", 2));

    let result = service
        .run(BattleRequest::new(entrant, wolf()))
        .await
        .expect("battle runs");

    assert!(!result.is_error(), "{:?}", result.error);
    assert_eq!(result.challenger.max_hp, 170);
}

#[tokio::test]
async fn bundled_status_names_reach_the_log() {
    let service = BattleService::from_config(&bundled_config(11)).expect("service builds");
    let mut effects = StatusEffects::empty();
    effects.apply(StatusKind::Burn, 1, false);
    let sturdy = |name: &str| Combatant::new(name, CreatureType::Beast, Stats::new(1_000, 10.0, 10.0, 10.0));

    let result = service
        .run(BattleRequest::new(sturdy("Ember").with_status_effects(effects), sturdy("Stone")))
        .await
        .expect("battle runs");

    assert!(result.log.iter().any(|l| l == "Ember takes 60 damage from Burn."));
    assert!(result.log.iter().any(|l| l == "Ember recovered from Burn."));
}

#[tokio::test]
async fn missing_content_directory_is_reported() {
    let config = RuntimeConfig {
        content_dir: Some("/nonexistent/combat-data".into()),
        ..RuntimeConfig::default()
    };

    let err = BattleService::from_config(&config).err().expect("load fails");

    assert!(matches!(err, RuntimeError::Content(_)));
}

#[tokio::test]
async fn invalid_combat_config_is_rejected() {
    let config = CombatConfig::default().with_max_turns(0);

    let err = BattleService::new(OracleManager::builtin(), config).err().expect("rejected");

    assert!(matches!(err, RuntimeError::Config(_)));
}

#[tokio::test]
async fn custom_content_directory_is_loaded() {
    let dir = tempfile::tempdir().expect("temp dir");
    let bundled = ContentFactory::bundled();
    for file in ["items.ron", "skills.ron", "statuses.ron"] {
        std::fs::copy(bundled.data_dir().join(file), dir.path().join(file)).expect("copy");
    }
    std::fs::write(dir.path().join("combat.toml"), "max_turns = 3\n").expect("write config");
    let config = RuntimeConfig {
        content_dir: Some(dir.path().to_path_buf()),
        ..RuntimeConfig::default()
    };
    let service = BattleService::from_config(&config).expect("service builds");
    let tank = |name: &str| Combatant::new(name, CreatureType::Beast, Stats::new(5_000, 10.0, 10.0, 10.0));

    let result = service
        .run(BattleRequest::new(tank("Left"), tank("Right")))
        .await
        .expect("battle runs");

    assert_eq!(service.config().max_turns, 3);
    assert_eq!(result.outcome, BattleOutcome::Draw);
    assert_eq!(result.turns, 3);
}

#[tokio::test]
async fn sessions_hand_requests_to_the_service() {
    let service = BattleService::from_config(&RuntimeConfig::default()).expect("service builds");
    let mut sessions = SessionStore::from_config(&SessionConfig::default());
    sessions.insert("player-1".to_string(), BattleRequest::new(wolf(), golem()));

    let request = sessions
        .remove(&"player-1".to_string())
        .expect("session present");
    let result = service.run(request).await.expect("battle runs");

    assert!(sessions.is_empty());
    assert!(!result.is_error());
}
