//! Skill tree catalog loader.
//!
//! Skills are grouped by creature type. Prerequisites refer to skills of the
//! same creature type and must form an acyclic graph.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use combat_core::{CreatureType, SkillDefinition, SkillId};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Skill catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCatalog {
    pub skills: Vec<SkillDefinition>,
}

/// Loader for skill definitions from RON files.
pub struct SkillLoader;

impl SkillLoader {
    /// Load and validate a skill catalog.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing SkillCatalog
    pub fn load(path: &Path) -> LoadResult<Vec<SkillDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<SkillDefinition>> {
        let catalog: SkillCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill catalog RON: {}", e))?;

        validate(&catalog.skills)?;

        tracing::debug!(count = catalog.skills.len(), "skill catalog loaded");
        Ok(catalog.skills)
    }
}

fn validate(skills: &[SkillDefinition]) -> LoadResult<()> {
    let mut trees: HashMap<CreatureType, HashMap<&SkillId, &SkillDefinition>> = HashMap::new();

    for skill in skills {
        if skill.max_level == 0 {
            anyhow::bail!("Skill '{}' must have max_level >= 1", skill.id);
        }
        if skill.effects.len() < skill.max_level as usize {
            anyhow::bail!(
                "Skill '{}' declares max_level {} but only {} effect levels",
                skill.id,
                skill.max_level,
                skill.effects.len()
            );
        }
        let tree = trees.entry(skill.creature_type).or_default();
        if tree.insert(&skill.id, skill).is_some() {
            anyhow::bail!(
                "Duplicate skill '{}' for creature type {}",
                skill.id,
                skill.creature_type
            );
        }
    }

    for (creature_type, tree) in &trees {
        for skill in tree.values() {
            for prerequisite in &skill.prerequisites {
                if !tree.contains_key(prerequisite) {
                    anyhow::bail!(
                        "Skill '{}' ({}) requires unknown skill '{}'",
                        skill.id,
                        creature_type,
                        prerequisite
                    );
                }
            }
        }
        check_acyclic(*creature_type, tree)?;
    }

    Ok(())
}

/// Depth-first search over prerequisite edges.
fn check_acyclic(
    creature_type: CreatureType,
    tree: &HashMap<&SkillId, &SkillDefinition>,
) -> LoadResult<()> {
    fn visit<'a>(
        id: &'a SkillId,
        tree: &HashMap<&'a SkillId, &'a SkillDefinition>,
        visiting: &mut HashSet<&'a SkillId>,
        done: &mut HashSet<&'a SkillId>,
    ) -> Result<(), &'a SkillId> {
        if done.contains(id) {
            return Ok(());
        }
        if !visiting.insert(id) {
            return Err(id);
        }
        if let Some(&skill) = tree.get(id) {
            for prerequisite in &skill.prerequisites {
                visit(prerequisite, tree, visiting, done)?;
            }
        }
        visiting.remove(id);
        done.insert(id);
        Ok(())
    }

    let mut visiting = HashSet::new();
    let mut done = HashSet::new();
    for &id in tree.keys() {
        visit(id, tree, &mut visiting, &mut done).map_err(|cycle_at| {
            anyhow::anyhow!(
                "Skill prerequisites for {} form a cycle through '{}'",
                creature_type,
                cycle_at
            )
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::BattleMode;

    const TREE: &str = r#"(
        skills: [
            (
                id: "thick_hide",
                name: "Thick Hide",
                creature_type: beast,
                max_level: 2,
                effects: [
                    (description: "+5 DEF", bonus: (def_bonus: Some(5.0))),
                    (description: "+10 DEF", bonus: (def_bonus: Some(10.0))),
                ],
            ),
            (
                id: "pack_hunter",
                name: "Pack Hunter",
                creature_type: beast,
                max_level: 1,
                battle_type: Some(party),
                prerequisites: ["thick_hide"],
                effects: [(bonus: (pack_bonus: Some(0.1)))],
            ),
        ],
    )"#;

    #[test]
    fn parses_a_valid_tree() {
        let skills = SkillLoader::parse(TREE).expect("tree parses");

        assert_eq!(skills.len(), 2);
        assert_eq!(skills[0].bonus_at(2).and_then(|b| b.def_bonus), Some(10.0));
        assert_eq!(skills[1].battle_type, Some(BattleMode::Party));
        assert_eq!(skills[1].prerequisites, vec![SkillId::new("thick_hide")]);
    }

    #[test]
    fn unknown_bonus_keys_fail_to_parse() {
        let err = SkillLoader::parse(
            r#"(skills: [(id: "x", name: "X", creature_type: beast, max_level: 1,
                effects: [(bonus: (atk_multipler: Some(1.2)))])])"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Failed to parse skill catalog"));
    }

    #[test]
    fn missing_prerequisite_is_rejected() {
        let err = SkillLoader::parse(
            r#"(skills: [(id: "x", name: "X", creature_type: mystic, max_level: 1,
                prerequisites: ["ghost"], effects: [(description: "")])])"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown skill 'ghost'"));
    }

    #[test]
    fn prerequisite_cycles_are_rejected() {
        let err = SkillLoader::parse(
            r#"(skills: [
                (id: "a", name: "A", creature_type: undead, max_level: 1,
                    prerequisites: ["b"], effects: [(description: "")]),
                (id: "b", name: "B", creature_type: undead, max_level: 1,
                    prerequisites: ["a"], effects: [(description: "")]),
            ])"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("form a cycle"));
    }

    #[test]
    fn same_id_in_different_trees_is_allowed() {
        let skills = SkillLoader::parse(
            r#"(skills: [
                (id: "focus", name: "Focus", creature_type: beast, max_level: 1, effects: [(description: "")]),
                (id: "focus", name: "Focus", creature_type: mystic, max_level: 1, effects: [(description: "")]),
            ])"#,
        );
        assert!(skills.is_ok());
    }
}
