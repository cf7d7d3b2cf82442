//! Battle result handed back to the caller.

use crate::state::{Combatant, Side, StatusEffectInstance};

/// Terminal state of a battle, from the challenger's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum BattleOutcome {
    Victory,
    Defeat,
    /// Turn limit reached with both sides standing.
    Draw,
    /// The battle loop failed; the defender is reported as winner.
    SimulationError,
}

/// Final state of one side, for persistence write-back.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantSummary {
    pub name: String,
    pub current_hp: u32,
    pub max_hp: u32,
    pub status_effects: Vec<StatusEffectInstance>,
}

impl From<&Combatant> for CombatantSummary {
    fn from(combatant: &Combatant) -> Self {
        Self {
            name: combatant.name.clone(),
            current_hp: combatant.current_hp,
            max_hp: combatant.max_hp(),
            status_effects: combatant.status_effects.iter().copied().collect(),
        }
    }
}

/// Immutable battle output.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleResult {
    pub outcome: BattleOutcome,
    /// Whether the challenger is credited with the win.
    pub player_won: bool,
    /// Challenger HP at the end of the battle.
    pub remaining_hp: u32,
    pub log: Vec<String>,
    pub winner: Option<Side>,
    pub loser: Option<Side>,
    /// Rounds played.
    pub turns: u32,
    pub challenger: CombatantSummary,
    pub opponent: CombatantSummary,
    /// Set for `SimulationError` results.
    pub error: Option<String>,
}

impl BattleResult {
    pub fn summary(&self, side: Side) -> &CombatantSummary {
        match side {
            Side::Challenger => &self.challenger,
            Side::Opponent => &self.opponent,
        }
    }

    pub fn winner_name(&self) -> Option<&str> {
        self.winner.map(|side| self.summary(side).name.as_str())
    }

    pub fn loser_name(&self) -> Option<&str> {
        self.loser.map(|side| self.summary(side).name.as_str())
    }

    pub fn is_error(&self) -> bool {
        self.outcome == BattleOutcome::SimulationError
    }
}
