//! Property-based tests using proptest
//!
//! Invariants that must hold for all inputs:
//! - Stat normalization: any raw input → floors respected
//! - Damage: any attacker/defender → damage >= 1
//! - Hit and crit chances stay inside their bounds
//! - Type table: multipliers in {0.75, 1, 1.5}, strong relation anti-symmetric
//! - Status countdown and stacking caps
//! - Battles always terminate within max_turns

use combat_core::combat::{Advantage, CombatLog, DamageInput, advantage, calculate_crit_chance};
use combat_core::{
    BattleEngine, BattleOutcome, BattleRequest, CombatConfig, CombatEnv, Combatant, CreatureType,
    PcgRandom, RawStats, Resistances, STANDARD_STATUSES, Stats, StatusKind, calculate_damage,
    calculate_hit_chance, clone_combatant, normalize, tick_status_effects, type_multiplier,
};
use proptest::prelude::*;
use strum::IntoEnumIterator;

fn creature_type() -> impl Strategy<Value = CreatureType> {
    prop::sample::select(CreatureType::iter().collect::<Vec<_>>())
}

fn maybe_f64() -> impl Strategy<Value = Option<f64>> {
    prop::option::of(prop::num::f64::ANY)
}

fn stats() -> impl Strategy<Value = Stats> {
    (1u32..400, 0.0f64..80.0, 0.0f64..80.0, 1.0f64..40.0, 0.0f64..60.0).prop_map(
        |(hp, atk, def, spd, luck)| Stats::new(hp, atk, def, spd).with_luck(luck),
    )
}

fn combatant(name: &'static str) -> impl Strategy<Value = Combatant> {
    (creature_type(), stats()).prop_map(move |(kind, stats)| Combatant::new(name, kind, stats))
}

// ============================================================
// Stat Resolver
// ============================================================

proptest! {
    #[test]
    fn prop_normalize_respects_floors(
        hp in maybe_f64(), atk in maybe_f64(), def in maybe_f64(), spd in maybe_f64(),
        luck in maybe_f64(), accuracy in maybe_f64(), evasion in maybe_f64(),
    ) {
        let stats = normalize(&RawStats { hp, atk, def, spd, luck, accuracy, evasion });
        prop_assert!(stats.hp >= 1);
        prop_assert!(stats.atk >= 1.0 && stats.atk.is_finite());
        prop_assert!(stats.def >= 0.0 && stats.def.is_finite());
        prop_assert!(stats.spd >= 1.0 && stats.spd.is_finite());
        prop_assert!(stats.luck >= 0.0 && stats.luck.is_finite());
        prop_assert!(stats.accuracy >= 0.1 && stats.accuracy.is_finite());
        prop_assert!(stats.evasion >= 0.1 && stats.evasion.is_finite());
    }

    #[test]
    fn prop_clone_is_independent(original in combatant("Original"), damage in 1u32..500) {
        let mut copy = clone_combatant(&original);
        copy.take_damage(damage);
        copy.status_effects.apply(StatusKind::Poison, 3, false);

        prop_assert!(original.status_effects.is_empty());
        prop_assert_eq!(original.current_hp, original.max_hp());
    }
}

// ============================================================
// Hit & Damage Resolvers
// ============================================================

proptest! {
    #[test]
    fn prop_damage_is_at_least_one(
        attacker in stats(), defender in stats(),
        attacker_type in creature_type(), defender_type in creature_type(),
        fire in 0.0f64..200.0, crit in any::<bool>(),
    ) {
        let config = CombatConfig::default();
        let resistances = Resistances { fire, ..Resistances::default() };
        let input = DamageInput {
            attacker: &attacker,
            attacker_type,
            defender: &defender,
            defender_type,
            defender_resistances: &resistances,
            damage_bonus: 0.0,
            is_critical: crit,
        };
        let damage = calculate_damage(&input, &config);
        prop_assert!(matches!(damage, Ok(d) if d >= 1), "damage {damage:?}");
    }

    #[test]
    fn prop_hit_chance_is_bounded(accuracy in prop::num::f64::ANY, evasion in prop::num::f64::ANY) {
        let chance = calculate_hit_chance(accuracy, evasion, &CombatConfig::default());
        prop_assert!((0.05..=0.99).contains(&chance), "chance {chance}");
    }

    #[test]
    fn prop_crit_chance_is_capped(luck in prop::num::f64::ANY, bonus in -1.0f64..1.0) {
        let chance = calculate_crit_chance(luck, bonus, &CombatConfig::default());
        prop_assert!((0.0..=0.3).contains(&chance), "chance {chance}");
    }

    #[test]
    fn prop_type_relation_is_anti_symmetric(a in creature_type(), b in creature_type()) {
        let config = CombatConfig::default();
        let multiplier = type_multiplier(a, b, &config);
        prop_assert!([0.75, 1.0, 1.5].contains(&multiplier));
        if advantage(a, b) == Advantage::Strong {
            prop_assert_ne!(advantage(b, a), Advantage::Strong);
        }
    }
}

// ============================================================
// Status Effect Engine
// ============================================================

proptest! {
    #[test]
    fn prop_status_counts_down_and_expires_on_time(duration in 1u32..8) {
        let mut c = Combatant::new("Target", CreatureType::Beast, Stats::new(10_000, 10.0, 10.0, 10.0));
        c.status_effects.apply(StatusKind::Burn, duration, false);
        let mut log = CombatLog::muted();

        for tick in 1..duration {
            tick_status_effects(&mut c, &STANDARD_STATUSES, &mut log);
            let effect = c.status_effects.get(StatusKind::Burn);
            prop_assert_eq!(effect.map(|e| e.turns_remaining), Some(duration - tick));
        }
        tick_status_effects(&mut c, &STANDARD_STATUSES, &mut log);
        prop_assert!(!c.status_effects.has(StatusKind::Burn));
    }

    #[test]
    fn prop_stacks_never_exceed_cap(reapply in prop::collection::vec(any::<bool>(), 1..30)) {
        let mut c = Combatant::new("Target", CreatureType::Undead, Stats::new(500, 10.0, 10.0, 10.0));
        let mut log = CombatLog::muted();
        for again in reapply {
            if again || !c.status_effects.has(StatusKind::Curse) {
                c.status_effects.apply(StatusKind::Curse, 4, true);
            }
            tick_status_effects(&mut c, &STANDARD_STATUSES, &mut log);
            if let Some(effect) = c.status_effects.get(StatusKind::Curse) {
                prop_assert!(effect.stacks.unwrap_or(0) <= 5);
            }
        }
    }
}

// ============================================================
// Combat Orchestrator
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_battle_always_terminates(
        challenger in combatant("Challenger"),
        opponent in combatant("Opponent"),
        max_turns in 1u32..=50,
        seed in any::<u64>(),
    ) {
        let config = CombatConfig::default().with_max_turns(max_turns);
        let engine = BattleEngine::new(CombatEnv::standard(), &config);
        let result = engine.simulate(&BattleRequest::new(challenger, opponent), &mut PcgRandom::new(seed));

        prop_assert!(!result.is_error(), "error: {:?}", result.error);
        prop_assert!(result.turns <= max_turns);
        if result.outcome == BattleOutcome::Draw {
            prop_assert_eq!(result.turns, max_turns);
        } else {
            prop_assert!(result.challenger.current_hp == 0 || result.opponent.current_hp == 0);
        }
    }
}
