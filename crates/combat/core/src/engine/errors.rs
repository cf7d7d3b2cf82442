use crate::config::ConfigError;
use crate::env::OracleError;
use crate::error::{CombatError, ErrorSeverity};

/// Battle-level failures.
///
/// Converted into a `SimulationError` result by
/// [`BattleEngine::simulate`](super::BattleEngine::simulate).
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum BattleError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Engine state broke an invariant mid-battle.
    #[error("invariant violated in round {round}: {detail}")]
    InvariantViolated { round: u32, detail: String },
}

impl CombatError for BattleError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Oracle(error) => error.severity(),
            Self::Config(error) => error.severity(),
            Self::InvariantViolated { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Oracle(error) => error.error_code(),
            Self::Config(error) => error.error_code(),
            Self::InvariantViolated { .. } => "BATTLE_INVARIANT_VIOLATED",
        }
    }
}
