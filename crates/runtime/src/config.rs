//! Runtime configuration structures and loaders.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, RuntimeError};

/// Runtime configuration shared by the battle service and session store.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Directory holding `combat.toml`, `items.ron`, `skills.ron` and
    /// `statuses.ron`. `None` runs on the built-in catalogs.
    pub content_dir: Option<PathBuf>,
    pub sessions: SessionConfig,
    pub logging: LoggingConfig,
    /// Fixed base seed for replayable battles. `None` seeds from the OS.
    pub rng_seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            content_dir: None,
            sessions: SessionConfig::default(),
            logging: LoggingConfig::default(),
            rng_seed: None,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    ///
    /// Environment variables:
    /// - `COMBAT_CONTENT_DIR` - Content data directory (default: built-in catalogs)
    /// - `COMBAT_SESSION_TTL_SECS` - Idle session lifetime (default: 300)
    /// - `COMBAT_MAX_SESSIONS` - Session store capacity (default: 1024)
    /// - `COMBAT_LOG_LEVEL` - Default tracing directive (default: info)
    /// - `COMBAT_RNG_SEED` - Base seed for replayable battles (default: random)
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::InvalidEnv`] for values that fail to parse.
    pub fn from_env() -> Result<Self> {
        // Missing .env is the common case
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`] over an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(dir) = lookup("COMBAT_CONTENT_DIR").filter(|d| !d.is_empty()) {
            config.content_dir = Some(PathBuf::from(dir));
        }
        if let Some(secs) = parse::<u64>(&lookup, "COMBAT_SESSION_TTL_SECS")? {
            config.sessions.ttl = Duration::from_secs(secs.max(1));
        }
        if let Some(capacity) = parse::<usize>(&lookup, "COMBAT_MAX_SESSIONS")? {
            config.sessions.capacity = capacity.max(1);
        }
        if let Some(level) = lookup("COMBAT_LOG_LEVEL").filter(|l| !l.is_empty()) {
            config.logging.level = level;
        }
        config.rng_seed = parse::<u64>(&lookup, "COMBAT_RNG_SEED")?;

        Ok(config)
    }
}

#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub ttl: Duration,
    pub capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            capacity: 1024,
        }
    }
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` takes precedence.
    pub level: String,
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            ansi: true,
        }
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<Option<T>>
where
    T: std::str::FromStr,
{
    let Some(value) = lookup(key) else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| RuntimeError::InvalidEnv { key, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = RuntimeConfig::from_lookup(lookup(&[])).expect("defaults");
        assert!(config.content_dir.is_none());
        assert_eq!(config.sessions.ttl, Duration::from_secs(300));
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.rng_seed, None);
    }

    #[test]
    fn reads_every_variable() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            ("COMBAT_CONTENT_DIR", "/srv/combat"),
            ("COMBAT_SESSION_TTL_SECS", "60"),
            ("COMBAT_MAX_SESSIONS", "0"),
            ("COMBAT_LOG_LEVEL", "combat_core=debug"),
            ("COMBAT_RNG_SEED", " 42 "),
        ]))
        .expect("parses");

        assert_eq!(config.content_dir, Some(PathBuf::from("/srv/combat")));
        assert_eq!(config.sessions.ttl, Duration::from_secs(60));
        assert_eq!(config.sessions.capacity, 1);
        assert_eq!(config.logging.level, "combat_core=debug");
        assert_eq!(config.rng_seed, Some(42));
    }

    #[test]
    fn malformed_number_is_an_error() {
        let err = RuntimeConfig::from_lookup(lookup(&[("COMBAT_RNG_SEED", "abc")])).unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidEnv { key: "COMBAT_RNG_SEED", .. }));
    }
}
