use anyhow::Result;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use crate::models::{FeedbackRecord, HintSnapshot, MovieRecord};
use crate::services::feedback_engine::FeedbackEngine;
use crate::services::hint_aggregator::HintAggregator;
use crate::stores::{Cache, GuessHistoryStore, HintStore, MovieCatalog};
use crate::utils::retry::{retry_async_with_config, RetryConfig};

/// Read-through/write-through coordinator for hint snapshots.
///
/// Reads go cache, then store, then a fresh aggregation over the replayed
/// guess history. A keyed async mutex guarantees at most one fresh
/// computation per (user, game) at a time; waiters re-check the cache and
/// store once they acquire the key and converge on the winner's result.
pub struct HintService {
    cache: Arc<dyn Cache>,
    store: Arc<dyn HintStore>,
    history: Arc<dyn GuessHistoryStore>,
    catalog: Arc<dyn MovieCatalog>,
    engine: FeedbackEngine,
    aggregator: HintAggregator,
    cache_ttl: Duration,
    inflight: Mutex<HashMap<String, Weak<tokio::sync::Mutex<()>>>>,
}

impl HintService {
    pub fn new(
        cache: Arc<dyn Cache>,
        store: Arc<dyn HintStore>,
        history: Arc<dyn GuessHistoryStore>,
        catalog: Arc<dyn MovieCatalog>,
        engine: FeedbackEngine,
        aggregator: HintAggregator,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            cache,
            store,
            history,
            catalog,
            engine,
            aggregator,
            cache_ttl,
            inflight: Mutex::new(HashMap::new()),
        }
    }

    fn cache_key(user_id: &str, game_id: &str) -> String {
        format!("hints:{user_id}:{game_id}")
    }

    /// Returns the hint snapshot for a (user, game), computing and
    /// persisting it if no fresh copy exists. Hints are best-effort
    /// enrichment: unresolvable targets or histories yield an empty
    /// snapshot rather than an error.
    pub async fn get_hints(
        &self,
        user_id: &str,
        game_id: &str,
        is_anonymous: bool,
        is_custom_game: bool,
    ) -> Result<HintSnapshot> {
        tracing::debug!(user_id, game_id, is_anonymous, is_custom_game, "get_hints");

        let key = Self::cache_key(user_id, game_id);

        if let Some(snapshot) = self.read_cache(&key).await {
            tracing::debug!(user_id, game_id, "returning cached hints");
            return Ok(snapshot);
        }

        if let Some(snapshot) = self.read_store(user_id, game_id).await {
            tracing::debug!(user_id, game_id, "returning stored hints");
            self.write_cache(&key, &snapshot).await;
            return Ok(snapshot);
        }

        // Serialize recomputation per key; whoever wins the lock computes,
        // everyone else picks up that result on the re-check.
        let gate = self.gate(&key);
        let _guard = gate.lock().await;

        if let Some(snapshot) = self.read_cache(&key).await {
            return Ok(snapshot);
        }
        if let Some(snapshot) = self.read_store(user_id, game_id).await {
            self.write_cache(&key, &snapshot).await;
            return Ok(snapshot);
        }

        let snapshot = self
            .compute(user_id, game_id, is_anonymous, is_custom_game)
            .await;

        // Persistence failures must not lose the computed result.
        if let Err(e) = self.store.set(user_id, game_id, &snapshot).await {
            tracing::error!(user_id, game_id, error = %e, "failed to persist hints");
        }
        self.write_cache(&key, &snapshot).await;

        Ok(snapshot)
    }

    /// Drops the persisted snapshot and its cached copy. Does not eagerly
    /// recompute; the next `get_hints` call aggregates afresh.
    pub async fn invalidate_hints(&self, user_id: &str, game_id: &str) -> Result<()> {
        tracing::debug!(user_id, game_id, "invalidate_hints");

        let key = Self::cache_key(user_id, game_id);
        if let Err(e) = self.cache.remove(&key).await {
            tracing::warn!(user_id, game_id, error = %e, "failed to drop cached hints");
        }

        self.store.delete(user_id, game_id).await?;
        Ok(())
    }

    fn gate(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut inflight = self.inflight.lock().expect("inflight lock poisoned");
        inflight.retain(|_, weak| weak.strong_count() > 0);

        if let Some(gate) = inflight.get(key).and_then(Weak::upgrade) {
            return gate;
        }

        let gate = Arc::new(tokio::sync::Mutex::new(()));
        inflight.insert(key.to_string(), Arc::downgrade(&gate));
        gate
    }

    async fn read_cache(&self, key: &str) -> Option<HintSnapshot> {
        match self.cache.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    tracing::warn!(key, error = %e, "discarding unreadable cached hints");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(key, error = %e, "cache read failed, falling through");
                None
            }
        }
    }

    async fn write_cache(&self, key: &str, snapshot: &HintSnapshot) {
        let raw = match serde_json::to_string(snapshot) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(key, error = %e, "failed to serialize hints for cache");
                return;
            }
        };

        if let Err(e) = self.cache.set(key, &raw, self.cache_ttl).await {
            tracing::warn!(key, error = %e, "failed to cache hints");
        }
    }

    async fn read_store(&self, user_id: &str, game_id: &str) -> Option<HintSnapshot> {
        let result = retry_async_with_config(RetryConfig::default(), || async {
            self.store.get(user_id, game_id).await
        })
        .await;

        match result {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(user_id, game_id, error = %e, "store read failed, recomputing");
                None
            }
        }
    }

    /// Replays the guess history against the target and folds it into a
    /// snapshot. Every miss along the way degrades to less information,
    /// never to an error.
    async fn compute(
        &self,
        user_id: &str,
        game_id: &str,
        is_anonymous: bool,
        is_custom_game: bool,
    ) -> HintSnapshot {
        let target = match self.resolve_target(game_id, is_custom_game).await {
            Some(target) => target,
            None => {
                tracing::debug!(game_id, "no target movie, returning empty hints");
                return HintSnapshot::new();
            }
        };

        let history_result = retry_async_with_config(RetryConfig::default(), || async {
            self.history.list(user_id, game_id, is_anonymous).await
        })
        .await;

        let guess_ids = match history_result {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(user_id, game_id, error = %e, "guess history unavailable");
                return HintSnapshot::new();
            }
        };

        if guess_ids.is_empty() {
            return HintSnapshot::new();
        }

        let mut records: Vec<FeedbackRecord> = Vec::with_capacity(guess_ids.len());
        for movie_id in guess_ids {
            let Some(guess) = self.resolve_movie(movie_id).await else {
                continue;
            };

            match self.engine.compare(&guess, &target) {
                Ok(record) => records.push(record),
                Err(e) => {
                    // Corrupt catalog data for one guess; hints stay best-effort.
                    tracing::error!(movie_id, error = %e, "skipping uncomparable guess");
                }
            }
        }

        self.aggregator.aggregate(&records, &target)
    }

    async fn resolve_target(&self, game_id: &str, is_custom_game: bool) -> Option<MovieRecord> {
        let result = if is_custom_game {
            self.catalog.custom_game_target(game_id).await
        } else {
            self.catalog.target_movie(game_id).await
        };

        match result {
            Ok(target) => target,
            Err(e) => {
                tracing::warn!(game_id, error = %e, "failed to resolve target movie");
                None
            }
        }
    }

    async fn resolve_movie(&self, movie_id: i64) -> Option<MovieRecord> {
        match self.catalog.movie_by_id(movie_id).await {
            Ok(Some(movie)) => Some(movie),
            Ok(None) => {
                tracing::warn!(movie_id, "guessed movie vanished from catalog");
                None
            }
            Err(e) => {
                tracing::warn!(movie_id, error = %e, "failed to resolve guessed movie");
                None
            }
        }
    }
}
