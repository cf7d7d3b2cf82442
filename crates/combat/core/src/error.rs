//! Common error infrastructure for combat-core.
//!
//! Domain-specific errors (`OracleError`, `AttackError`, `BattleError`) live
//! next to the code that raises them and share the [`CombatError`] trait.
//!
//! # Failure policy
//!
//! - **Attack-level** failures degrade the attack to the configured minimum
//!   damage; the battle continues.
//! - **Battle-level** failures end the battle with a terminal
//!   simulation-error result; nothing propagates to the caller as a panic.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - the engine substitutes a safe fallback.
    ///
    /// Examples: one attack produced a non-finite damage value
    Recoverable,

    /// Validation error - invalid input that was rejected.
    ///
    /// Examples: combatant references an unknown creature type
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - the battle cannot be simulated.
    ///
    /// Examples: a required oracle is missing from the environment
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all combat-core errors.
///
/// - Use `#[derive(thiserror::Error)]` for the Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
