pub mod feedback;
pub mod hint;
pub mod movie;

pub use feedback::{Category, Color, FeedbackField, FeedbackRecord, BOLD_MODIFIER};
pub use hint::{CategoryHint, HintSnapshot};
pub use movie::{MovieRecord, Person, Rating};
