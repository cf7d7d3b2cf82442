use crate::state::{CreatureType, SkillDefinition, SkillId};

/// Read-only skill catalog, one skill set per creature type.
pub trait SkillOracle: Send + Sync {
    fn skill(&self, creature_type: CreatureType, id: &SkillId) -> Option<SkillDefinition>;

    /// Every skill in a creature type's catalog.
    fn skills_for(&self, creature_type: CreatureType) -> Vec<SkillDefinition>;
}
