use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::{EngineError, GameError};
use crate::models::{FeedbackRecord, MovieRecord};
use crate::services::feedback_engine::FeedbackEngine;
use crate::stores::{Cache, GuessHistoryStore, MovieCatalog};

/// Guess flow: resolve movies, compute feedback, record the guess.
///
/// Feedback for a (guess, target) pair is referentially transparent, so it
/// is cached by the id pair; cache trouble degrades to recomputation.
pub struct GuessService {
    catalog: Arc<dyn MovieCatalog>,
    cache: Arc<dyn Cache>,
    history: Arc<dyn GuessHistoryStore>,
    engine: FeedbackEngine,
    cache_ttl: Duration,
}

impl GuessService {
    pub fn new(
        catalog: Arc<dyn MovieCatalog>,
        cache: Arc<dyn Cache>,
        history: Arc<dyn GuessHistoryStore>,
        engine: FeedbackEngine,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            catalog,
            cache,
            history,
            engine,
            cache_ttl,
        }
    }

    fn cache_key(guess_id: i64, target_id: i64) -> String {
        format!("guess:{guess_id}:{target_id}")
    }

    /// Pure comparison of two already-resolved movies.
    pub fn compare(
        &self,
        guess: &MovieRecord,
        target: &MovieRecord,
    ) -> Result<FeedbackRecord, EngineError> {
        self.engine.compare(guess, target)
    }

    /// Comparison with a read-through cache keyed by the movie id pair.
    pub async fn guess_feedback(
        &self,
        guess: &MovieRecord,
        target: &MovieRecord,
    ) -> Result<FeedbackRecord, GameError> {
        let key = Self::cache_key(guess.id, target.id);

        match self.cache.get(&key).await {
            Ok(Some(raw)) => {
                if let Ok(record) = serde_json::from_str::<FeedbackRecord>(&raw) {
                    tracing::debug!(key, "returning cached feedback");
                    return Ok(record);
                }
                tracing::warn!(key, "discarding unreadable cached feedback");
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(key, error = %e, "feedback cache read failed");
            }
        }

        let record = self.engine.compare(guess, target)?;

        match serde_json::to_string(&record) {
            Ok(raw) => {
                if let Err(e) = self.cache.set(&key, &raw, self.cache_ttl).await {
                    tracing::warn!(key, error = %e, "failed to cache feedback");
                }
            }
            Err(e) => {
                tracing::error!(key, error = %e, "failed to serialize feedback for cache");
            }
        }

        Ok(record)
    }

    /// Resolves a submitted guess against a game's target, records it in
    /// the history and returns its feedback. The caller invalidates hints
    /// for the (user, game) afterwards so the next hints read reaggregates.
    pub async fn submit_guess(
        &self,
        user_id: &str,
        game_id: &str,
        movie_id: i64,
        is_anonymous: bool,
        is_custom_game: bool,
    ) -> Result<FeedbackRecord, GameError> {
        tracing::debug!(user_id, game_id, movie_id, "submit_guess");

        let target = if is_custom_game {
            self.catalog.custom_game_target(game_id).await
        } else {
            self.catalog.target_movie(game_id).await
        }
        .context("Failed to resolve target movie")?
        .ok_or_else(|| GameError::TargetNotFound(game_id.to_string()))?;

        let guess = self
            .catalog
            .movie_by_id(movie_id)
            .await
            .context("Failed to resolve guessed movie")?
            .ok_or(GameError::MovieNotFound(movie_id))?;

        let record = self.guess_feedback(&guess, &target).await?;

        let sequence = self
            .history
            .append(user_id, game_id, movie_id, is_anonymous)
            .await
            .context("Failed to record guess")?;

        tracing::info!(user_id, game_id, movie_id, sequence, "guess recorded");

        Ok(record)
    }
}
