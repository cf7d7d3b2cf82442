use crate::state::{StatKind, StatusEffectDefinition, StatusKind};

/// Read-only status effect catalog.
pub trait StatusOracle: Send + Sync {
    fn definition(&self, kind: StatusKind) -> Option<StatusEffectDefinition>;

    /// Default duration for a kind, if the catalog knows it.
    fn default_duration(&self, kind: StatusKind) -> Option<u32> {
        self.definition(kind).map(|def| def.duration)
    }

    /// Whether re-application refreshes instead of replacing.
    fn is_stacking(&self, kind: StatusKind) -> bool {
        self.definition(kind).is_some_and(|def| def.stacking.is_some())
    }
}

/// Built-in status catalog used when no content files are loaded.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardStatuses;

/// Shared instance for environments that borrow their oracles.
pub static STANDARD_STATUSES: StandardStatuses = StandardStatuses;

impl StandardStatuses {
    pub fn definition_of(kind: StatusKind) -> StatusEffectDefinition {
        use StatusKind::*;
        let def = StatusEffectDefinition::new;
        match kind {
            Burn => def(Burn, 3).damage_per_turn(0.06),
            Poison => def(Poison, 4).damage_per_turn(0.05),
            Bleed => def(Bleed, 3).damage_per_turn(0.04),
            Freeze => def(Freeze, 1).skips_turn(),
            Stun => def(Stun, 1).skips_turn(),
            // turn order halves speed separately
            Slow => def(Slow, 2).debuff(StatKind::Evasion, 0.8),
            Silence => def(Silence, 2).disables_skills(),
            Fear => def(Fear, 2).debuff(StatKind::Atk, 0.75),
            Weaken => def(Weaken, 3)
                .debuff(StatKind::Atk, 0.7)
                .debuff(StatKind::Def, 0.85),
            Curse => def(Curse, 4).stacking(StatKind::Atk, -0.1, 5),
            Corrode => def(Corrode, 4).stacking(StatKind::Def, -0.1, 5),
            Regen => def(Regen, 3).heal_per_turn(0.05),
            Fortify => def(Fortify, 3).buff(StatKind::Def, 1.3),
            Haste => def(Haste, 2).buff(StatKind::Spd, 1.5),
            Rage => def(Rage, 2).buff(StatKind::Atk, 1.3),
        }
    }
}

impl StatusOracle for StandardStatuses {
    fn definition(&self, kind: StatusKind) -> Option<StatusEffectDefinition> {
        Some(Self::definition_of(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_kind_has_a_positive_duration() {
        for kind in StatusKind::iter() {
            let def = StandardStatuses::definition_of(kind);
            assert_eq!(def.kind, kind);
            assert!(def.duration >= 1, "{kind} has zero duration");
        }
    }

    #[test]
    fn only_curse_and_corrode_stack() {
        let stacking: Vec<_> = StatusKind::iter()
            .filter(|k| STANDARD_STATUSES.is_stacking(*k))
            .collect();
        assert_eq!(stacking, vec![StatusKind::Curse, StatusKind::Corrode]);
    }
}
