//! In-memory doubles for the store and catalog traits, so coordinator
//! tests run without Mongo or Redis.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use moviedle_api::config::{GameConfig, NumericThresholds};
use moviedle_api::models::{HintSnapshot, MovieRecord, Person, Rating};
use moviedle_api::services::{FeedbackEngine, HintAggregator, HintService};
use moviedle_api::stores::{Cache, GuessHistoryStore, HintStore, MovieCatalog};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn game_config() -> GameConfig {
    GameConfig {
        year: NumericThresholds {
            yellow: 5,
            single_arrow: 10,
            double_arrow: 15,
        },
        box_office: NumericThresholds {
            yellow: 50,
            single_arrow: 100,
            double_arrow: 200,
        },
        ..GameConfig::default()
    }
}

pub fn movie(id: i64, year: &str, rating: Rating) -> MovieRecord {
    MovieRecord {
        id,
        title: format!("Movie {id}"),
        genres: vec!["Drama".into(), "Crime".into()],
        cast: vec![
            Person {
                name: format!("Actor {id}"),
                role: Some("Lead".into()),
            },
            Person {
                name: "Shared Actor".into(),
                role: None,
            },
        ],
        creatives: vec![Person {
            name: format!("Director {id}"),
            role: Some("Director".into()),
        }],
        box_office: 400 + id,
        year: year.into(),
        rating,
    }
}

#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str, _ttl: Duration) -> Result<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

impl MemoryCache {
    pub async fn contains(&self, key: &str) -> bool {
        self.entries.lock().await.contains_key(key)
    }
}

#[derive(Default)]
pub struct MemoryHintStore {
    rows: Mutex<HashMap<(String, String), HintSnapshot>>,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl MemoryHintStore {
    /// Seeds a row without going through the trait (or its failure knobs).
    pub async fn set_direct(&self, user_id: &str, game_id: &str, hints: HintSnapshot) {
        self.rows
            .lock()
            .await
            .insert((user_id.to_string(), game_id.to_string()), hints);
    }

    pub async fn row(&self, user_id: &str, game_id: &str) -> Option<HintSnapshot> {
        self.rows
            .lock()
            .await
            .get(&(user_id.to_string(), game_id.to_string()))
            .cloned()
    }
}

#[async_trait]
impl HintStore for MemoryHintStore {
    async fn get(&self, user_id: &str, game_id: &str) -> Result<Option<HintSnapshot>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            bail!("hint store read unavailable");
        }
        Ok(self.row(user_id, game_id).await)
    }

    async fn set(&self, user_id: &str, game_id: &str, hints: &HintSnapshot) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("hint store write unavailable");
        }
        self.rows
            .lock()
            .await
            .insert((user_id.to_string(), game_id.to_string()), hints.clone());
        Ok(())
    }

    async fn delete(&self, user_id: &str, game_id: &str) -> Result<()> {
        self.rows
            .lock()
            .await
            .remove(&(user_id.to_string(), game_id.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryGuessHistory {
    entries: Mutex<HashMap<(String, String, bool), Vec<i64>>>,
}

impl MemoryGuessHistory {
    pub async fn seed(&self, user_id: &str, game_id: &str, anonymous: bool, ids: &[i64]) {
        self.entries
            .lock()
            .await
            .insert((user_id.into(), game_id.into(), anonymous), ids.to_vec());
    }
}

#[async_trait]
impl GuessHistoryStore for MemoryGuessHistory {
    async fn list(&self, user_id: &str, game_id: &str, anonymous: bool) -> Result<Vec<i64>> {
        Ok(self
            .entries
            .lock()
            .await
            .get(&(user_id.to_string(), game_id.to_string(), anonymous))
            .cloned()
            .unwrap_or_default())
    }

    async fn append(
        &self,
        user_id: &str,
        game_id: &str,
        movie_id: i64,
        anonymous: bool,
    ) -> Result<u32> {
        let mut entries = self.entries.lock().await;
        let list = entries
            .entry((user_id.to_string(), game_id.to_string(), anonymous))
            .or_default();
        list.push(movie_id);
        Ok(list.len() as u32)
    }
}

#[derive(Default)]
pub struct StaticCatalog {
    pub movies: HashMap<i64, MovieRecord>,
    pub targets: HashMap<String, MovieRecord>,
    pub target_calls: AtomicUsize,
    /// Optional delay on target resolution to widen concurrency windows.
    pub target_delay: Option<Duration>,
}

impl StaticCatalog {
    pub fn with_game(game_id: &str, target: MovieRecord, guesses: Vec<MovieRecord>) -> Self {
        let mut movies: HashMap<i64, MovieRecord> =
            guesses.into_iter().map(|m| (m.id, m)).collect();
        movies.insert(target.id, target.clone());

        Self {
            movies,
            targets: HashMap::from([(game_id.to_string(), target)]),
            ..Self::default()
        }
    }
}

#[async_trait]
impl MovieCatalog for StaticCatalog {
    async fn movie_by_id(&self, id: i64) -> Result<Option<MovieRecord>> {
        Ok(self.movies.get(&id).cloned())
    }

    async fn target_movie(&self, game_id: &str) -> Result<Option<MovieRecord>> {
        self.target_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.target_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.targets.get(game_id).cloned())
    }

    async fn custom_game_target(&self, game_id: &str) -> Result<Option<MovieRecord>> {
        self.target_movie(game_id).await
    }
}

pub struct TestHarness {
    pub cache: Arc<MemoryCache>,
    pub store: Arc<MemoryHintStore>,
    pub history: Arc<MemoryGuessHistory>,
    pub catalog: Arc<StaticCatalog>,
    pub service: Arc<HintService>,
}

pub fn harness(catalog: StaticCatalog) -> TestHarness {
    init_tracing();

    let cache = Arc::new(MemoryCache::default());
    let store = Arc::new(MemoryHintStore::default());
    let history = Arc::new(MemoryGuessHistory::default());
    let catalog = Arc::new(catalog);

    let service = Arc::new(HintService::new(
        cache.clone(),
        store.clone(),
        history.clone(),
        catalog.clone(),
        FeedbackEngine::new(game_config()),
        HintAggregator::new(game_config()),
        Duration::from_secs(60),
    ));

    TestHarness {
        cache,
        store,
        history,
        catalog,
        service,
    }
}
