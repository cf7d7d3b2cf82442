//! Type advantage table.
//!
//! The seven creature types form a fixed directed graph: each type is strong
//! against exactly two others, weak against exactly two, and neutral against
//! the remaining two.
//!
//! ```text
//! Beast       > Mystic, Undead
//! Mystic      > Celestial, Elemental
//! Celestial   > Undead, Mechanical
//! Undead      > Elemental, Aeonic
//! Elemental   > Mechanical, Beast
//! Mechanical  > Aeonic, Mystic
//! Aeonic      > Beast, Celestial
//! ```

use std::str::FromStr;

use crate::config::CombatConfig;
use crate::state::CreatureType;

/// Relation of an attacker's type to a defender's type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Advantage {
    Strong,
    Neutral,
    Weak,
}

/// The two types `creature_type` is strong against.
pub const fn strong_against(creature_type: CreatureType) -> [CreatureType; 2] {
    use CreatureType::*;
    match creature_type {
        Beast => [Mystic, Undead],
        Mystic => [Celestial, Elemental],
        Celestial => [Undead, Mechanical],
        Undead => [Elemental, Aeonic],
        Elemental => [Mechanical, Beast],
        Mechanical => [Aeonic, Mystic],
        Aeonic => [Beast, Celestial],
    }
}

/// The two types `creature_type` is weak against.
pub const fn weak_against(creature_type: CreatureType) -> [CreatureType; 2] {
    use CreatureType::*;
    match creature_type {
        Beast => [Elemental, Aeonic],
        Mystic => [Beast, Mechanical],
        Celestial => [Mystic, Aeonic],
        Undead => [Beast, Celestial],
        Elemental => [Mystic, Undead],
        Mechanical => [Celestial, Elemental],
        Aeonic => [Undead, Mechanical],
    }
}

pub fn advantage(attacker: CreatureType, defender: CreatureType) -> Advantage {
    if strong_against(attacker).contains(&defender) {
        Advantage::Strong
    } else if weak_against(attacker).contains(&defender) {
        Advantage::Weak
    } else {
        Advantage::Neutral
    }
}

/// Damage multiplier for an attacker/defender type pair.
pub fn type_multiplier(
    attacker: CreatureType,
    defender: CreatureType,
    config: &CombatConfig,
) -> f64 {
    match advantage(attacker, defender) {
        Advantage::Strong => config.strong_multiplier,
        Advantage::Weak => config.weak_multiplier,
        Advantage::Neutral => 1.0,
    }
}

/// Multiplier lookup by type name. Unknown names are neutral.
pub fn type_multiplier_by_name(attacker: &str, defender: &str, config: &CombatConfig) -> f64 {
    match (
        CreatureType::from_str(attacker),
        CreatureType::from_str(defender),
    ) {
        (Ok(a), Ok(d)) => type_multiplier(a, d, config),
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn beast_is_strong_against_mystic() {
        let config = CombatConfig::default();
        assert_eq!(
            type_multiplier(CreatureType::Beast, CreatureType::Mystic, &config),
            1.5
        );
        assert_eq!(
            type_multiplier(CreatureType::Mystic, CreatureType::Beast, &config),
            0.75
        );
    }

    #[test]
    fn weak_table_is_inverse_of_strong_table() {
        for a in CreatureType::iter() {
            for d in CreatureType::iter() {
                let a_strong = strong_against(a).contains(&d);
                let d_weak = weak_against(d).contains(&a);
                assert_eq!(a_strong, d_weak, "{a} vs {d}");
            }
        }
    }

    #[test]
    fn each_type_has_two_neutral_opponents() {
        for a in CreatureType::iter() {
            let neutral = CreatureType::iter()
                .filter(|d| *d != a && advantage(a, *d) == Advantage::Neutral)
                .count();
            assert_eq!(neutral, 2, "{a}");
            assert_eq!(advantage(a, a), Advantage::Neutral);
        }
    }

    #[test]
    fn unknown_names_are_neutral() {
        let config = CombatConfig::default();
        assert_eq!(type_multiplier_by_name("dragon", "beast", &config), 1.0);
        assert_eq!(type_multiplier_by_name("Beast", "undead", &config), 1.5);
    }
}
