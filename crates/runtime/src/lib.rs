//! Runtime embedding for the combat engine.
//!
//! This crate wires static content, oracle access and async execution into a
//! small API for services that host battles. Consumers build a
//! [`BattleService`] (usually via [`RuntimeConfig::from_env`]) and keep any
//! per-player state in a [`SessionStore`].
//!
//! Modules are organized by responsibility:
//! - [`oracle`] adapts loaded content to the engine's oracle traits
//! - [`service`] runs battles on blocking workers
//! - [`session`] owns in-flight sessions with idle eviction
//! - [`config`] and [`logging`] cover process setup
pub mod config;
pub mod error;
pub mod logging;
pub mod oracle;
pub mod service;
pub mod session;

pub use config::{LoggingConfig, RuntimeConfig, SessionConfig};
pub use error::{Result, RuntimeError};
pub use logging::init_tracing;
pub use oracle::{ItemOracleImpl, OracleManager, SkillOracleImpl, StatusOracleImpl};
pub use service::BattleService;
pub use session::{SessionStore, SharedSessionStore, spawn_reaper};
