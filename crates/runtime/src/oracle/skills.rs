//! [`combat_core::SkillOracle`] keyed by creature type.
use combat_core::{CreatureType, SkillDefinition, SkillId, SkillOracle};
use std::collections::HashMap;

/// SkillOracle implementation holding one catalog per creature type.
///
/// Catalog order is preserved so bonuses merge in definition order.
pub struct SkillOracleImpl {
    trees: HashMap<CreatureType, Vec<SkillDefinition>>,
}

impl SkillOracleImpl {
    pub fn new() -> Self {
        Self {
            trees: HashMap::new(),
        }
    }

    /// Add a skill to its creature type's catalog, replacing a previous
    /// definition with the same id in place.
    pub fn add_definition(&mut self, def: SkillDefinition) {
        let tree = self.trees.entry(def.creature_type).or_default();
        match tree.iter_mut().find(|existing| existing.id == def.id) {
            Some(existing) => *existing = def,
            None => tree.push(def),
        }
    }
}

impl Default for SkillOracleImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<SkillDefinition> for SkillOracleImpl {
    fn from_iter<T: IntoIterator<Item = SkillDefinition>>(iter: T) -> Self {
        let mut oracle = Self::new();
        for def in iter {
            oracle.add_definition(def);
        }
        oracle
    }
}

impl SkillOracle for SkillOracleImpl {
    fn skill(&self, creature_type: CreatureType, id: &SkillId) -> Option<SkillDefinition> {
        self.trees
            .get(&creature_type)?
            .iter()
            .find(|def| &def.id == id)
            .cloned()
    }

    fn skills_for(&self, creature_type: CreatureType) -> Vec<SkillDefinition> {
        self.trees.get(&creature_type).cloned().unwrap_or_default()
    }
}
