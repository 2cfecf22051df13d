use crate::config::Config;
use crate::stores::{MongoGuessHistoryStore, MongoHintStore, MovieCatalog, RedisCache};
use mongodb::{Client as MongoClient, Database};
use redis::aio::ConnectionManager;
use std::sync::Arc;
use std::time::Duration;

pub mod feedback_engine;
pub mod guess_service;
pub mod hint_aggregator;
pub mod hint_service;

pub use feedback_engine::FeedbackEngine;
pub use guess_service::GuessService;
pub use hint_aggregator::HintAggregator;
pub use hint_service::HintService;

/// Shared application state: configuration, storage handles and the
/// injected movie catalog. Service constructors wire the concrete Redis and
/// Mongo adapters behind the store traits.
pub struct AppState {
    pub config: Config,
    pub mongo: Database,
    pub redis: ConnectionManager,
    pub catalog: Arc<dyn MovieCatalog>,
}

impl AppState {
    pub async fn new(
        config: Config,
        mongo_client: MongoClient,
        redis_client: redis::Client,
        catalog: Arc<dyn MovieCatalog>,
    ) -> anyhow::Result<Self> {
        let mongo = mongo_client.database(&config.mongo_database);

        tracing::info!("Attempting to connect to Redis...");

        let redis = tokio::time::timeout(
            std::time::Duration::from_secs(30),
            ConnectionManager::new(redis_client),
        )
        .await
        .map_err(|_| anyhow::anyhow!("Redis connection timeout after 30s"))??;

        // Test connection
        let mut conn = redis.clone();
        tokio::time::timeout(
            std::time::Duration::from_secs(5),
            redis::cmd("PING").query_async::<String>(&mut conn),
        )
        .await
        .map_err(|_| anyhow::anyhow!("Redis PING timeout after 5s"))??;

        tracing::info!("Redis connection established successfully");

        Ok(Self {
            config,
            mongo,
            redis,
            catalog,
        })
    }

    fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.config.game.cache_ttl_seconds)
    }

    pub fn guess_service(&self) -> GuessService {
        GuessService::new(
            self.catalog.clone(),
            Arc::new(RedisCache::new(self.redis.clone())),
            Arc::new(MongoGuessHistoryStore::new(&self.mongo)),
            FeedbackEngine::new(self.config.game.clone()),
            self.cache_ttl(),
        )
    }

    pub fn hint_service(&self) -> HintService {
        HintService::new(
            Arc::new(RedisCache::new(self.redis.clone())),
            Arc::new(MongoHintStore::new(&self.mongo)),
            Arc::new(MongoGuessHistoryStore::new(&self.mongo)),
            self.catalog.clone(),
            FeedbackEngine::new(self.config.game.clone()),
            HintAggregator::new(self.config.game.clone()),
            self.cache_ttl(),
        )
    }
}
