//! [`combat_core::StatusOracle`] loaded from content with built-in fallback.
use combat_core::{StandardStatuses, StatusEffectDefinition, StatusKind, StatusOracle};
use std::collections::HashMap;

/// StatusOracle implementation backed by loaded definitions.
///
/// Kinds without a loaded definition resolve to the built-in catalog, so a
/// partial `statuses.ron` never leaves a kind undefined.
pub struct StatusOracleImpl {
    definitions: HashMap<StatusKind, StatusEffectDefinition>,
}

impl StatusOracleImpl {
    pub fn new() -> Self {
        Self {
            definitions: HashMap::new(),
        }
    }

    pub fn add_definition(&mut self, def: StatusEffectDefinition) {
        self.definitions.insert(def.kind, def);
    }
}

impl Default for StatusOracleImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<StatusEffectDefinition> for StatusOracleImpl {
    fn from_iter<T: IntoIterator<Item = StatusEffectDefinition>>(iter: T) -> Self {
        let mut oracle = Self::new();
        for def in iter {
            oracle.add_definition(def);
        }
        oracle
    }
}

impl StatusOracle for StatusOracleImpl {
    fn definition(&self, kind: StatusKind) -> Option<StatusEffectDefinition> {
        let def = self
            .definitions
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| StandardStatuses::definition_of(kind));
        Some(def)
    }
}
