//! Async front door to the synchronous battle engine.
//!
//! Each battle runs on a blocking worker with its own RNG stream, its own
//! combatant clones and its own log, so any number of battles can be in
//! flight at once. The service itself only holds immutable catalogs.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use combat_content::ContentFactory;
use combat_core::{BattleEngine, BattleRequest, BattleResult, CombatConfig, PcgRandom, compute_seed};
use tokio::task::JoinSet;

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::oracle::OracleManager;

#[derive(Clone)]
pub struct BattleService {
    oracles: OracleManager,
    config: Arc<CombatConfig>,
    base_seed: Option<u64>,
    nonce: Arc<AtomicU64>,
}

impl BattleService {
    /// # Errors
    ///
    /// Returns [`RuntimeError::Config`] if `config` fails validation.
    pub fn new(oracles: OracleManager, config: CombatConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            oracles,
            config: Arc::new(config),
            base_seed: None,
            nonce: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Builds a service from runtime configuration, loading content from
    /// `content_dir` when one is set.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Content`] if a content file is missing or
    /// malformed.
    pub fn from_config(runtime: &RuntimeConfig) -> Result<Self> {
        let service = match &runtime.content_dir {
            Some(dir) => {
                let bundle = ContentFactory::new(dir).load_all()?;
                Self::new(OracleManager::from_content(&bundle), bundle.config)?
            }
            None => {
                tracing::info!("no content directory configured, using built-in catalogs");
                Self::new(OracleManager::builtin(), CombatConfig::default())?
            }
        };
        Ok(service.with_base_seed(runtime.rng_seed))
    }

    /// Derives every battle's seed from `seed` and a per-service counter, so
    /// a replayed sequence of requests reproduces the same results.
    pub fn with_base_seed(mut self, seed: Option<u64>) -> Self {
        self.base_seed = seed;
        self
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn oracles(&self) -> &OracleManager {
        &self.oracles
    }

    /// Runs one battle on a blocking worker.
    ///
    /// Engine failures come back as a `SimulationError` outcome, not as `Err`.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::WorkerJoin`] if the worker panicked or was
    /// cancelled.
    pub async fn run(&self, request: BattleRequest) -> Result<BattleResult> {
        self.run_seeded(request, self.next_seed()).await
    }

    /// Runs one battle with an explicit seed, bypassing the service's stream.
    pub async fn run_seeded(&self, request: BattleRequest, seed: u64) -> Result<BattleResult> {
        let oracles = self.oracles.clone();
        let config = Arc::clone(&self.config);

        let result = tokio::task::spawn_blocking(move || {
            let engine = BattleEngine::new(oracles.as_combat_env(), &config);
            engine.simulate(&request, &mut PcgRandom::new(seed))
        })
        .await
        .map_err(RuntimeError::WorkerJoin)?;

        if result.is_error() {
            tracing::warn!(seed, error = ?result.error, "battle ended in simulation error");
        } else {
            tracing::info!(
                seed,
                outcome = ?result.outcome,
                turns = result.turns,
                winner = ?result.winner_name(),
                "battle finished"
            );
        }
        Ok(result)
    }

    /// Runs independent battles concurrently; results keep request order.
    ///
    /// Seeds are drawn in request order before any battle starts.
    pub async fn run_all(&self, requests: Vec<BattleRequest>) -> Result<Vec<BattleResult>> {
        let mut set = JoinSet::new();
        for (index, request) in requests.into_iter().enumerate() {
            let service = self.clone();
            let seed = self.next_seed();
            set.spawn(async move { (index, service.run_seeded(request, seed).await) });
        }

        let mut results: Vec<Option<BattleResult>> = Vec::new();
        results.resize_with(set.len(), || None);
        while let Some(joined) = set.join_next().await {
            let (index, result) = joined.map_err(RuntimeError::WorkerJoin)?;
            results[index] = Some(result?);
        }
        Ok(results.into_iter().flatten().collect())
    }

    fn next_seed(&self) -> u64 {
        let nonce = self.nonce.fetch_add(1, Ordering::Relaxed);
        match self.base_seed {
            Some(base) => compute_seed(base, nonce, 0, 0),
            None => rand::random(),
        }
    }
}
