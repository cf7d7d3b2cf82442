//! Battle orchestrator.
//!
//! [`BattleEngine`] drives one battle from start to a terminal
//! [`BattleResult`]. Each call works on snapshots of the request's
//! combatants and its own [`CombatLog`](crate::combat::CombatLog), so
//! independent battles can run concurrently on separate threads with no
//! shared mutable state.
//!
//! # Round structure
//!
//! 1. Tick status effects for both sides; apply pending paradox reflections.
//! 2. Determine acting order by effective speed.
//! 3. First actor attacks, then the second if still eligible.
//! 4. End-of-round regeneration and self-repair.
//!
//! The battle ends when a side is defeated (after death handling) or when
//! `max_turns` rounds have been played.
mod attack;
mod battle;
mod death;
mod errors;

pub use errors::BattleError;

use crate::combat::{BattleOutcome, BattleResult, CombatantSummary};
use crate::config::CombatConfig;
use crate::env::{CombatEnv, RandomSource};
use crate::error::CombatError;
use crate::state::{BattleMode, Combatant, PartyContext, Side, SkillTree};

use battle::Battle;

/// One side of a battle request.
#[derive(Clone, Debug, PartialEq)]
pub struct BattleEntrant {
    pub combatant: Combatant,
    pub skill_tree: SkillTree,
    pub party: PartyContext,
}

impl BattleEntrant {
    pub fn new(combatant: Combatant) -> Self {
        Self {
            combatant,
            skill_tree: SkillTree::default(),
            party: PartyContext::solo(),
        }
    }

    pub fn with_skill_tree(mut self, skill_tree: SkillTree) -> Self {
        self.skill_tree = skill_tree;
        self
    }

    pub fn with_party(mut self, party: PartyContext) -> Self {
        self.party = party;
        self
    }
}

impl From<Combatant> for BattleEntrant {
    fn from(combatant: Combatant) -> Self {
        Self::new(combatant)
    }
}

/// Everything needed to resolve one battle.
#[derive(Clone, Debug, PartialEq)]
pub struct BattleRequest {
    /// First-listed combatant; usually the player's creature.
    pub challenger: BattleEntrant,
    pub opponent: BattleEntrant,
    pub mode: BattleMode,
}

impl BattleRequest {
    pub fn new(challenger: impl Into<BattleEntrant>, opponent: impl Into<BattleEntrant>) -> Self {
        Self {
            challenger: challenger.into(),
            opponent: opponent.into(),
            mode: BattleMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: BattleMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn entrant(&self, side: Side) -> &BattleEntrant {
        match side {
            Side::Challenger => &self.challenger,
            Side::Opponent => &self.opponent,
        }
    }
}

/// Stateless battle resolver bound to a catalog environment and config.
#[derive(Clone, Copy)]
pub struct BattleEngine<'a> {
    env: CombatEnv<'a>,
    config: &'a CombatConfig,
}

impl<'a> BattleEngine<'a> {
    pub fn new(env: CombatEnv<'a>, config: &'a CombatConfig) -> Self {
        Self { env, config }
    }

    pub fn config(&self) -> &'a CombatConfig {
        self.config
    }

    /// Resolves a battle. Never fails.
    ///
    /// A battle-level error becomes a `SimulationError` result in which the
    /// opponent (the defender) is reported as winner.
    pub fn simulate(&self, request: &BattleRequest, rng: &mut dyn RandomSource) -> BattleResult {
        match self.try_simulate(request, rng) {
            Ok(result) => result,
            Err(error) => {
                tracing::warn!(
                    code = error.error_code(),
                    severity = error.severity().as_str(),
                    %error,
                    "battle simulation failed"
                );
                simulation_error(request, &error)
            }
        }
    }

    /// Resolves a battle, surfacing battle-level errors.
    ///
    /// # Errors
    ///
    /// Returns `BattleError` when the config is invalid, a required oracle is
    /// missing, or a battle invariant breaks mid-loop.
    pub fn try_simulate(
        &self,
        request: &BattleRequest,
        rng: &mut dyn RandomSource,
    ) -> Result<BattleResult, BattleError> {
        let span = tracing::debug_span!(
            "battle",
            challenger = %request.challenger.combatant.name,
            opponent = %request.opponent.combatant.name,
            mode = %request.mode,
        );
        let _enter = span.enter();

        self.config.validate()?;
        let battle = Battle::prepare(request, &self.env, self.config)?;
        let result = battle.run(rng)?;

        tracing::debug!(
            outcome = %result.outcome,
            turns = result.turns,
            "battle resolved"
        );
        Ok(result)
    }
}

fn simulation_error(request: &BattleRequest, error: &BattleError) -> BattleResult {
    let challenger = CombatantSummary::from(&request.challenger.combatant);
    let opponent = CombatantSummary::from(&request.opponent.combatant);
    BattleResult {
        outcome: BattleOutcome::SimulationError,
        player_won: false,
        remaining_hp: challenger.current_hp,
        log: vec!["An error occurred during the battle.".to_string()],
        winner: Some(Side::Opponent),
        loser: Some(Side::Challenger),
        turns: 0,
        challenger,
        opponent,
        error: Some(error.to_string()),
    }
}
