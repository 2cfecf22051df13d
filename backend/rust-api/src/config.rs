use serde::Deserialize;
use std::env;

use crate::models::Rating;

/// Cutoffs converting an absolute numeric difference into a color and a
/// direction magnitude. `yellow < single_arrow < double_arrow`.
#[derive(Debug, Clone, Deserialize)]
pub struct NumericThresholds {
    pub yellow: i64,
    pub single_arrow: i64,
    pub double_arrow: i64,
}

/// Immutable game rules passed into the engines at construction.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub year: NumericThresholds,
    pub box_office: NumericThresholds,
    /// Ordered rating scale used for hint narrowing. Neighbor selection is
    /// by position in this list.
    pub rating_scale: Vec<Rating>,
    pub cache_ttl_seconds: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            year: NumericThresholds {
                yellow: 5,
                single_arrow: 10,
                double_arrow: 20,
            },
            box_office: NumericThresholds {
                yellow: 50_000_000,
                single_arrow: 150_000_000,
                double_arrow: 500_000_000,
            },
            rating_scale: vec![Rating::G, Rating::Pg, Rating::Pg13, Rating::R, Rating::Nc17],
            cache_ttl_seconds: 600,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub mongo_uri: String,
    pub redis_uri: String,
    pub mongo_database: String,
    pub game: GameConfig,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let config_builder = config::Config::builder()
            .add_source(
                config::File::with_name(&format!("config/{}", env)).required(false), // Allow missing config file, fallback to ENV
            )
            // Override with environment variables (prefix: APP_)
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        let settings = config_builder.build()?;

        let mongo_uri = settings
            .get_string("database.mongo_uri")
            .or_else(|_| env::var("MONGO_URI"))
            .unwrap_or_else(|_| "mongodb://localhost:27017/moviedle".to_string());

        let redis_uri = settings
            .get_string("redis.uri")
            .or_else(|_| env::var("REDIS_URI"))
            .unwrap_or_else(|_| "redis://127.0.0.1:6379/0".to_string());

        let mongo_database = settings
            .get_string("database.mongo_database")
            .or_else(|_| env::var("MONGO_DATABASE"))
            .unwrap_or_else(|_| "moviedle".to_string());

        let game = settings.get::<GameConfig>("game").unwrap_or_default();

        Ok(Config {
            mongo_uri,
            redis_uri,
            mongo_database,
            game,
        })
    }
}
