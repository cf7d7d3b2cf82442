//! Traits describing read-only combat data.
//!
//! Oracles expose item definitions, skill catalogs and status effect
//! behavior. The [`Env`] aggregate bundles them so the engine can reach
//! everything it needs without coupling to concrete implementations.
//! Randomness is passed separately as a [`RandomSource`] because it is the
//! only mutable input to a battle.
mod error;
mod items;
mod rng;
mod skills;
mod statuses;

pub use error::OracleError;
pub use items::ItemOracle;
pub use rng::{FixedRandom, PcgRandom, RandomSource, SequenceRandom, compute_seed};
pub use skills::SkillOracle;
pub use statuses::{STANDARD_STATUSES, StandardStatuses, StatusOracle};

/// Aggregates read-only oracles required by the combat engine.
pub struct Env<'a, I, S, T>
where
    I: ItemOracle + ?Sized,
    S: SkillOracle + ?Sized,
    T: StatusOracle + ?Sized,
{
    items: Option<&'a I>,
    skills: Option<&'a S>,
    statuses: Option<&'a T>,
}

impl<I, S, T> Clone for Env<'_, I, S, T>
where
    I: ItemOracle + ?Sized,
    S: SkillOracle + ?Sized,
    T: StatusOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<I, S, T> Copy for Env<'_, I, S, T>
where
    I: ItemOracle + ?Sized,
    S: SkillOracle + ?Sized,
    T: StatusOracle + ?Sized,
{
}

pub type CombatEnv<'a> = Env<'a, dyn ItemOracle + 'a, dyn SkillOracle + 'a, dyn StatusOracle + 'a>;

impl<'a, I, S, T> Env<'a, I, S, T>
where
    I: ItemOracle + ?Sized,
    S: SkillOracle + ?Sized,
    T: StatusOracle + ?Sized,
{
    pub fn new(items: Option<&'a I>, skills: Option<&'a S>, statuses: Option<&'a T>) -> Self {
        Self {
            items,
            skills,
            statuses,
        }
    }

    pub fn with_all(items: &'a I, skills: &'a S, statuses: &'a T) -> Self {
        Self::new(Some(items), Some(skills), Some(statuses))
    }

    pub fn empty() -> Self {
        Self {
            items: None,
            skills: None,
            statuses: None,
        }
    }

    /// Returns the ItemOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::ItemsNotAvailable` if no item oracle was provided.
    pub fn items(&self) -> Result<&'a I, OracleError> {
        self.items.ok_or(OracleError::ItemsNotAvailable)
    }

    /// Returns the SkillOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::SkillsNotAvailable` if no skill oracle was provided.
    pub fn skills(&self) -> Result<&'a S, OracleError> {
        self.skills.ok_or(OracleError::SkillsNotAvailable)
    }

    /// Returns the StatusOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::StatusesNotAvailable` if no status oracle was provided.
    pub fn statuses(&self) -> Result<&'a T, OracleError> {
        self.statuses.ok_or(OracleError::StatusesNotAvailable)
    }
}

impl<'a, I, S, T> Env<'a, I, S, T>
where
    I: ItemOracle + 'a,
    S: SkillOracle + 'a,
    T: StatusOracle + 'a,
{
    /// Converts this environment into a trait-object based `CombatEnv`.
    pub fn as_combat_env(&self) -> CombatEnv<'a> {
        let items: Option<&'a dyn ItemOracle> = self.items.map(|items| items as _);
        let skills: Option<&'a dyn SkillOracle> = self.skills.map(|skills| skills as _);
        let statuses: Option<&'a dyn StatusOracle> = self.statuses.map(|statuses| statuses as _);
        Env::new(items, skills, statuses)
    }
}

impl<'a> CombatEnv<'a> {
    /// Environment with only the built-in status catalog.
    ///
    /// Enough for battles between combatants without equipment or skills.
    pub fn standard() -> Self {
        let statuses: &'a dyn StatusOracle = &STANDARD_STATUSES;
        Env::new(None, None, Some(statuses))
    }

    /// Replaces the status catalog.
    pub fn with_statuses(mut self, statuses: &'a dyn StatusOracle) -> Self {
        self.statuses = Some(statuses);
        self
    }

    pub fn with_items(mut self, items: &'a dyn ItemOracle) -> Self {
        self.items = Some(items);
        self
    }

    pub fn with_skills(mut self, skills: &'a dyn SkillOracle) -> Self {
        self.skills = Some(skills);
        self
    }
}
