//! Tracing subscriber setup for embedders and tests.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingConfig;
use crate::error::{Result, RuntimeError};

/// Installs a global `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// `config.level`.
///
/// Returns `Ok(false)` when a global subscriber was already installed, so it
/// is safe to call more than once.
pub fn init_tracing(config: &LoggingConfig) -> Result<bool> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| RuntimeError::Tracing(format!("invalid filter {:?}: {e}", config.level)))?,
    };

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_ansi(config.ansi))
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(level = %config.level, "tracing initialized");
    }
    Ok(installed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_is_a_no_op() {
        let config = LoggingConfig {
            level: "warn".to_string(),
            ansi: false,
        };
        let _ = init_tracing(&config).expect("valid filter");
        assert!(!init_tracing(&config).expect("valid filter"));
    }
}
