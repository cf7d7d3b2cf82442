//! Unified error type surfaced by the runtime API.
//!
//! Wraps content loading, configuration and worker failures so embedders
//! can bubble them up with consistent context. Battle-level failures are not
//! errors here: the engine reports them as a simulation-error result.
use thiserror::Error;

use combat_core::{CombatError, ConfigError, ErrorSeverity};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Content(#[from] anyhow::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("environment variable {key} has invalid value {value:?}")]
    InvalidEnv { key: &'static str, value: String },

    #[error("battle worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("failed to install tracing subscriber: {0}")]
    Tracing(String),
}

impl CombatError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Config(err) => err.severity(),
            Self::Content(_) | Self::InvalidEnv { .. } => ErrorSeverity::Validation,
            Self::WorkerJoin(_) => ErrorSeverity::Internal,
            Self::Tracing(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Content(_) => "RUNTIME_CONTENT",
            Self::Config(err) => err.error_code(),
            Self::InvalidEnv { .. } => "RUNTIME_INVALID_ENV",
            Self::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
            Self::Tracing(_) => "RUNTIME_TRACING",
        }
    }
}
