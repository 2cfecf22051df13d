use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::time::Duration;

use super::Cache;

/// Redis-backed cache. The connection manager is cheap to clone per call
/// and reconnects on its own.
pub struct RedisCache {
    redis: ConnectionManager,
}

impl RedisCache {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.redis.clone();

        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .with_context(|| format!("Failed to read cache key {key}"))?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.redis.clone();

        let _: () = redis::cmd("SETEX")
            .arg(key)
            .arg(ttl.as_secs().max(1))
            .arg(value)
            .query_async(&mut conn)
            .await
            .with_context(|| format!("Failed to cache key {key}"))?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut conn = self.redis.clone();

        let _: () = redis::cmd("DEL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .with_context(|| format!("Failed to delete cache key {key}"))?;

        Ok(())
    }
}
