use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

use crate::models::{HintSnapshot, MovieRecord};

pub mod mongo;
pub mod redis_cache;

pub use mongo::{MongoGuessHistoryStore, MongoHintStore};
pub use redis_cache::RedisCache;

/// Volatile key-value cache. Values are JSON strings; entries expire after
/// the given TTL.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Durable per-(user, game) hint snapshot storage.
#[async_trait]
pub trait HintStore: Send + Sync {
    async fn get(&self, user_id: &str, game_id: &str) -> Result<Option<HintSnapshot>>;
    async fn set(&self, user_id: &str, game_id: &str, hints: &HintSnapshot) -> Result<()>;
    async fn delete(&self, user_id: &str, game_id: &str) -> Result<()>;
}

/// Append-only guess history scoped to (user, game), ordered by submission.
#[async_trait]
pub trait GuessHistoryStore: Send + Sync {
    /// Guessed movie ids in strict submission order.
    async fn list(&self, user_id: &str, game_id: &str, anonymous: bool) -> Result<Vec<i64>>;

    /// Records a guess and returns its sequence number.
    async fn append(
        &self,
        user_id: &str,
        game_id: &str,
        movie_id: i64,
        anonymous: bool,
    ) -> Result<u32>;
}

/// External movie catalog. Resolution misses are `Ok(None)`, not errors.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    async fn movie_by_id(&self, id: i64) -> Result<Option<MovieRecord>>;

    /// The hidden target for a daily game.
    async fn target_movie(&self, game_id: &str) -> Result<Option<MovieRecord>>;

    /// The hidden target for a user-created custom game.
    async fn custom_game_target(&self, game_id: &str) -> Result<Option<MovieRecord>>;
}
