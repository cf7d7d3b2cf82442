//! Skill tree bonus application.
//!
//! Runs once per battle on the battle-local combatant copy. Eligible skills
//! fold their immediate stat transforms into the working stats and merge
//! their remaining fields into [`Combatant::skill_bonuses`].

use crate::env::SkillOracle;
use crate::state::{
    BattleMode, Combatant, PartyContext, SkillBonuses, SkillDefinition, SkillId, SkillTree,
    StatKind, Stats,
};

/// Beast skill whose bonus doubles in party battles alongside other beasts.
pub const PACK_HUNTER: &str = "pack_hunter";

/// Luck granted per 1.0 of skill crit chance.
const LUCK_PER_CRIT_CHANCE: f64 = 100.0;

/// Applies every eligible unlocked skill to `combatant`.
///
/// A skill is skipped when it is unknown to the catalog, restricted to a
/// different battle mode, missing a prerequisite, or unlocked at level 0.
/// Levels above `max_level` use the top level.
pub fn apply_bonuses(
    combatant: &mut Combatant,
    tree: &SkillTree,
    mode: BattleMode,
    context: PartyContext,
    skills: &(impl SkillOracle + ?Sized),
) {
    let mut merged = combatant.skill_bonuses.clone();

    for unlocked in &tree.unlocked {
        let Some(skill) = skills.skill(combatant.creature_type, &unlocked.skill_id) else {
            tracing::trace!(skill = %unlocked.skill_id, "unknown skill skipped");
            continue;
        };
        if skill.battle_type.is_some_and(|only| only != mode) {
            continue;
        }
        if !prerequisites_met(&skill, tree) {
            tracing::trace!(skill = %skill.id, "prerequisites not met");
            continue;
        }
        let Some(bonus) = skill.bonus_at(unlocked.level) else {
            continue;
        };

        let bonus = if is_pack_hunter_boosted(&skill.id, mode, context) {
            bonus.doubled()
        } else {
            bonus.clone()
        };

        apply_immediate(&mut combatant.stats, &bonus, context);
        merged.merge(&bonus);
    }

    combatant.stats = combatant.stats.normalized();
    combatant.current_hp = combatant.current_hp.min(combatant.stats.hp);
    combatant.skill_bonuses = merged;
}

/// Whether every prerequisite of `skill` is unlocked at level 1 or higher.
pub fn prerequisites_met(skill: &SkillDefinition, tree: &SkillTree) -> bool {
    skill
        .prerequisites
        .iter()
        .all(|prerequisite| tree.level_of(prerequisite) >= 1)
}

fn is_pack_hunter_boosted(id: &SkillId, mode: BattleMode, context: PartyContext) -> bool {
    id.as_str() == PACK_HUNTER && mode == BattleMode::Party && context.beast_count > 1
}

/// Folds the immediate transforms of one skill level into `stats`.
pub fn apply_immediate(stats: &mut Stats, bonus: &SkillBonuses, context: PartyContext) {
    if let Some(multiplier) = bonus.atk_multiplier {
        stats.scale(StatKind::Atk, multiplier);
    }
    if let Some(def) = bonus.def_bonus {
        stats.scale(StatKind::Def, 1.0 + def);
    }
    if let Some(spd) = bonus.spd_bonus {
        stats.scale(StatKind::Spd, 1.0 + spd);
    }
    if let Some(all) = bonus.all_stats {
        for stat in [StatKind::Atk, StatKind::Def, StatKind::Spd] {
            stats.scale(stat, 1.0 + all);
        }
    }
    if let Some(magic) = bonus.magic_damage {
        stats.scale(StatKind::Atk, 1.0 + magic);
    }
    if let Some(crit) = bonus.crit_chance {
        stats.add(StatKind::Luck, crit * LUCK_PER_CRIT_CHANCE);
    }
    if let Some(pack) = bonus.pack_bonus.filter(|_| context.beast_count > 1) {
        stats.scale(StatKind::Atk, 1.0 + pack);
    }
}
