//! Creature categories and battle framing.

/// Creature category.
///
/// Category drives type advantage, which skill catalog applies, and a
/// handful of category-specific mechanics (Elemental resistance scaling,
/// Beast pack bonuses).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CreatureType {
    /// Predators; pack hunters.
    Beast,
    /// Arcane casters; resonance stacking.
    Mystic,
    /// Divine guardians; protection and barriers.
    Celestial,
    /// Risen dead; rituals and life drain.
    Undead,
    /// Fire, ice and storm spirits.
    Elemental,
    /// Constructs; overload and self-repair.
    Mechanical,
    /// Time-bound entities; echoes and paradoxes.
    Aeonic,
}

/// Battle framing. Skills may restrict themselves to one mode.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BattleMode {
    /// Controlled creature against a wild monster.
    #[default]
    Wild,
    /// Two controlled creatures.
    Duel,
    /// Creature fighting as part of a party.
    Party,
    /// Dungeon floor encounter.
    Dungeon,
}

/// Party composition context for party battles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartyContext {
    /// Beasts fighting on the creature's side, including itself.
    pub beast_count: u32,
}

impl PartyContext {
    pub const fn solo() -> Self {
        Self { beast_count: 1 }
    }

    pub const fn with_beasts(beast_count: u32) -> Self {
        Self { beast_count }
    }
}

/// Which side of a battle a combatant is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Side {
    /// First-listed combatant (usually the player's creature).
    Challenger,
    /// Second-listed combatant.
    Opponent,
}

impl Side {
    pub const fn other(self) -> Self {
        match self {
            Self::Challenger => Self::Opponent,
            Self::Opponent => Self::Challenger,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Challenger => 0,
            Self::Opponent => 1,
        }
    }
}
