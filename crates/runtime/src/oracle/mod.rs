//! Runtime wrappers around static combat content oracles.
//!
//! These implementations expose `combat-core` oracle traits and bundle them
//! into an [`OracleManager`] so the runtime can build [`combat_core::Env`]
//! snapshots on demand. The data is immutable at runtime; per-battle state
//! lives in the engine's combatant clones.
mod items;
mod skills;
mod statuses;

use combat_content::ContentBundle;
use combat_core::{CombatEnv, Env};
use std::sync::Arc;

pub use items::ItemOracleImpl;
pub use skills::SkillOracleImpl;
pub use statuses::StatusOracleImpl;

/// Manages all oracle implementations and provides unified access
#[derive(Clone)]
pub struct OracleManager {
    pub(crate) items: Arc<ItemOracleImpl>,
    pub(crate) skills: Arc<SkillOracleImpl>,
    pub(crate) statuses: Arc<StatusOracleImpl>,
}

impl OracleManager {
    /// Creates a new oracle manager
    pub fn new(
        items: Arc<ItemOracleImpl>,
        skills: Arc<SkillOracleImpl>,
        statuses: Arc<StatusOracleImpl>,
    ) -> Self {
        Self {
            items,
            skills,
            statuses,
        }
    }

    /// Empty item and skill catalogs with the built-in statuses.
    pub fn builtin() -> Self {
        Self::new(
            Arc::new(ItemOracleImpl::new()),
            Arc::new(SkillOracleImpl::new()),
            Arc::new(StatusOracleImpl::new()),
        )
    }

    /// Builds oracles from loaded content.
    pub fn from_content(bundle: &ContentBundle) -> Self {
        Self::new(
            Arc::new(bundle.items.iter().cloned().collect()),
            Arc::new(bundle.skills.iter().cloned().collect()),
            Arc::new(bundle.statuses.iter().cloned().collect()),
        )
    }

    /// Converts oracle manager into CombatEnv for combat-core
    pub fn as_combat_env(&self) -> CombatEnv<'_> {
        Env::with_all(
            self.items.as_ref(),
            self.skills.as_ref(),
            self.statuses.as_ref(),
        )
        .as_combat_env()
    }

    pub fn items(&self) -> &ItemOracleImpl {
        &self.items
    }

    pub fn skills(&self) -> &SkillOracleImpl {
        &self.skills
    }
}
