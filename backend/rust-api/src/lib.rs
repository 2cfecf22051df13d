//! Moviedle backend: feedback and hint inference for a daily
//! movie-guessing game.
//!
//! A guess is compared against the hidden target per attribute
//! ([`services::FeedbackEngine`]), the session's feedback history folds
//! into narrowing per-category hints ([`services::HintAggregator`]), and
//! [`services::HintService`] coordinates the cache/store layers around
//! recomputation. The HTTP surface, identity and the movie catalog live
//! outside this crate and plug in through the traits in [`stores`].

pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod stores;
pub mod utils;

pub use config::Config;
pub use services::AppState;
