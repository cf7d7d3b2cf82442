//! Oracle access errors.

use crate::error::{CombatError, ErrorSeverity};

/// Errors raised when a required catalog is missing from the environment.
///
/// Unknown ids inside a catalog are not errors: lookups return `None` and the
/// caller skips the entry.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    /// ItemOracle is not available in the environment.
    #[error("ItemOracle not available")]
    ItemsNotAvailable,

    /// SkillOracle is not available in the environment.
    #[error("SkillOracle not available")]
    SkillsNotAvailable,

    /// StatusOracle is not available in the environment.
    #[error("StatusOracle not available")]
    StatusesNotAvailable,
}

impl CombatError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            ItemsNotAvailable => "ORACLE_ITEMS_NOT_AVAILABLE",
            SkillsNotAvailable => "ORACLE_SKILLS_NOT_AVAILABLE",
            StatusesNotAvailable => "ORACLE_STATUSES_NOT_AVAILABLE",
        }
    }
}
