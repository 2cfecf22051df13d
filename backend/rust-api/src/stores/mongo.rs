use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

use super::{GuessHistoryStore, HintStore};
use crate::models::HintSnapshot;

/// Stored hint row. Hints are kept as JSON text so the document schema does
/// not track every snapshot shape change.
#[derive(Debug, Serialize, Deserialize)]
struct HintDocument {
    user_id: String,
    game_id: String,
    hints_json: String,
    last_updated: DateTime<Utc>,
}

pub struct MongoHintStore {
    collection: Collection<HintDocument>,
}

impl MongoHintStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("user_hints"),
        }
    }
}

#[async_trait]
impl HintStore for MongoHintStore {
    async fn get(&self, user_id: &str, game_id: &str) -> Result<Option<HintSnapshot>> {
        let doc = self
            .collection
            .find_one(doc! { "user_id": user_id, "game_id": game_id })
            .await
            .context("Failed to read stored hints")?;

        let Some(doc) = doc else {
            return Ok(None);
        };

        match serde_json::from_str::<HintSnapshot>(&doc.hints_json) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                // Corrupt row: treat as a miss so the next read recomputes.
                tracing::warn!(
                    user_id,
                    game_id,
                    error = %e,
                    "discarding unreadable stored hints"
                );
                Ok(None)
            }
        }
    }

    async fn set(&self, user_id: &str, game_id: &str, hints: &HintSnapshot) -> Result<()> {
        let hints_json = serde_json::to_string(hints).context("Failed to serialize hints")?;

        self.collection
            .update_one(
                doc! { "user_id": user_id, "game_id": game_id },
                doc! { "$set": {
                    "user_id": user_id,
                    "game_id": game_id,
                    "hints_json": hints_json,
                    "last_updated": Utc::now().to_rfc3339(),
                }},
            )
            .upsert(true)
            .await
            .context("Failed to store hints")?;

        Ok(())
    }

    async fn delete(&self, user_id: &str, game_id: &str) -> Result<()> {
        self.collection
            .delete_one(doc! { "user_id": user_id, "game_id": game_id })
            .await
            .context("Failed to delete stored hints")?;

        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct GuessDocument {
    user_id: String,
    game_id: String,
    sequence_id: u32,
    movie_id: i64,
    anonymous: bool,
    inserted: DateTime<Utc>,
}

pub struct MongoGuessHistoryStore {
    collection: Collection<GuessDocument>,
}

impl MongoGuessHistoryStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("user_guesses"),
        }
    }

    fn filter(user_id: &str, game_id: &str, anonymous: bool) -> mongodb::bson::Document {
        doc! { "user_id": user_id, "game_id": game_id, "anonymous": anonymous }
    }
}

#[async_trait]
impl GuessHistoryStore for MongoGuessHistoryStore {
    async fn list(&self, user_id: &str, game_id: &str, anonymous: bool) -> Result<Vec<i64>> {
        let cursor = self
            .collection
            .find(Self::filter(user_id, game_id, anonymous))
            .sort(doc! { "sequence_id": 1 })
            .await
            .context("Failed to list guess history")?;

        let docs: Vec<GuessDocument> = cursor
            .try_collect()
            .await
            .context("Failed to collect guess history")?;

        Ok(docs.into_iter().map(|d| d.movie_id).collect())
    }

    async fn append(
        &self,
        user_id: &str,
        game_id: &str,
        movie_id: i64,
        anonymous: bool,
    ) -> Result<u32> {
        // Guesses for one (user, game) arrive serially from a single player,
        // so a count-derived sequence is sufficient.
        let existing = self
            .collection
            .count_documents(Self::filter(user_id, game_id, anonymous))
            .await
            .context("Failed to count guess history")?;

        let sequence_id = existing as u32 + 1;

        self.collection
            .insert_one(GuessDocument {
                user_id: user_id.to_string(),
                game_id: game_id.to_string(),
                sequence_id,
                movie_id,
                anonymous,
                inserted: Utc::now(),
            })
            .await
            .context("Failed to record guess")?;

        Ok(sequence_id)
    }
}
