use crate::models::Category;

/// Input/data errors from the pure comparison engine. These indicate
/// upstream data corruption and are never retried.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("expected numeric {category} value, got {value:?}")]
    NonNumericValue { category: Category, value: String },
}

/// Errors surfaced by the guess flow.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("movie {0} not found")]
    MovieNotFound(i64),

    #[error("no target movie for game {0}")]
    TargetNotFound(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
