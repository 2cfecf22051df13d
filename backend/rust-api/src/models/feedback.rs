use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Modifier tag marking a list value as confirmed-shared with the target.
pub const BOLD_MODIFIER: &str = "bold";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Green,
    Yellow,
    Grey,
}

/// Feedback category, keyed on the wire by its camelCase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Rating,
    Year,
    BoxOffice,
    Genre,
    Cast,
    Creatives,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Rating,
        Category::Year,
        Category::BoxOffice,
        Category::Genre,
        Category::Cast,
        Category::Creatives,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Category::Rating => "rating",
            Category::Year => "year",
            Category::BoxOffice => "boxOffice",
            Category::Genre => "genre",
            Category::Cast => "cast",
            Category::Creatives => "creatives",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Per-category comparison result.
///
/// `direction` is a signed magnitude in [-2, 2]; negative means the guess is
/// above the target. `values` are the guessed values, for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackField {
    pub color: Color,
    pub direction: i32,
    pub values: Vec<String>,
    #[serde(default)]
    pub modifiers: BTreeMap<String, Vec<String>>,
}

impl FeedbackField {
    /// Exact-match field for a set of guessed values.
    pub fn exact(values: Vec<String>) -> Self {
        Self {
            color: Color::Green,
            direction: 0,
            values,
            modifiers: BTreeMap::new(),
        }
    }
}

/// One guess's feedback across all categories.
pub type FeedbackRecord = BTreeMap<Category, FeedbackField>;
