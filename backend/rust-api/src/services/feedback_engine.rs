use std::collections::BTreeMap;

use crate::config::{GameConfig, NumericThresholds};
use crate::errors::EngineError;
use crate::models::{
    Category, Color, FeedbackField, FeedbackRecord, MovieRecord, Rating, BOLD_MODIFIER,
};

/// Pure comparison of a guessed movie against the hidden target.
///
/// Holds only immutable configuration; safe to share and to call
/// concurrently for independent (guess, target) pairs. Identical inputs
/// always produce identical output.
#[derive(Debug, Clone)]
pub struct FeedbackEngine {
    config: GameConfig,
}

impl FeedbackEngine {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    /// Compares `guess` against `target` across every category.
    ///
    /// Fails only when a year cannot be parsed as an integer, which signals
    /// corrupt catalog data rather than a bad guess.
    pub fn compare(
        &self,
        guess: &MovieRecord,
        target: &MovieRecord,
    ) -> Result<FeedbackRecord, EngineError> {
        let mut fields = FeedbackRecord::new();

        fields.insert(
            Category::Rating,
            Self::compare_rating(guess.rating, target.rating),
        );

        let guess_year = parse_numeric(Category::Year, &guess.year)?;
        let target_year = parse_numeric(Category::Year, &target.year)?;
        fields.insert(
            Category::Year,
            compare_numeric(guess_year, target_year, guess.year.clone(), &self.config.year),
        );

        fields.insert(
            Category::BoxOffice,
            compare_numeric(
                guess.box_office,
                target.box_office,
                guess.box_office.to_string(),
                &self.config.box_office,
            ),
        );

        fields.insert(
            Category::Genre,
            compare_list(guess.genres.clone(), &target.genres),
        );
        fields.insert(
            Category::Cast,
            compare_list(guess.cast_names(), &target.cast_names()),
        );
        fields.insert(
            Category::Creatives,
            compare_list(guess.creative_credits(), &target.creative_credits()),
        );

        Ok(fields)
    }

    /// Ordinal comparison: distance 1 is a near miss, further is grey.
    /// Ratings carry no arrow semantics, so direction stays 0.
    fn compare_rating(guess: Rating, target: Rating) -> FeedbackField {
        let values = vec![guess.label().to_string()];

        if guess == target {
            return FeedbackField::exact(values);
        }

        let distance = (guess.ordinal() - target.ordinal()).abs();
        let color = if distance == 1 {
            Color::Yellow
        } else {
            Color::Grey
        };

        FeedbackField {
            color,
            direction: 0,
            values,
            modifiers: BTreeMap::new(),
        }
    }
}

fn parse_numeric(category: Category, value: &str) -> Result<i64, EngineError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| EngineError::NonNumericValue {
            category,
            value: value.to_string(),
        })
}

/// Numeric comparison against configured thresholds.
///
/// The direction magnitude tells the player how far off they are (0 within
/// the single-arrow threshold, 2 past the double-arrow threshold) and the
/// sign which way to move: positive when the target is above the guess.
fn compare_numeric(
    guess: i64,
    target: i64,
    display: String,
    thresholds: &NumericThresholds,
) -> FeedbackField {
    if guess == target {
        return FeedbackField::exact(vec![display]);
    }

    let diff = guess - target;
    let diff_abs = diff.abs();

    let color = if diff_abs < thresholds.yellow {
        Color::Yellow
    } else {
        Color::Grey
    };

    let mut direction = if diff_abs > thresholds.double_arrow {
        2
    } else if diff_abs > thresholds.single_arrow {
        1
    } else {
        0
    };

    if diff > 0 {
        direction = -direction;
    }

    FeedbackField {
        color,
        direction,
        values: vec![display],
        modifiers: BTreeMap::new(),
    }
}

/// Set-membership comparison. Shared values are tagged bold; a guess whose
/// values are all shared counts as a full match.
fn compare_list(guess_values: Vec<String>, target_values: &[String]) -> FeedbackField {
    let shared: Vec<&String> = guess_values
        .iter()
        .filter(|v| target_values.contains(v))
        .collect();

    if shared.len() == guess_values.len() {
        return FeedbackField::exact(guess_values);
    }

    let color = if shared.is_empty() {
        Color::Grey
    } else {
        Color::Yellow
    };

    let modifiers: BTreeMap<String, Vec<String>> = shared
        .into_iter()
        .map(|v| (v.clone(), vec![BOLD_MODIFIER.to_string()]))
        .collect();

    FeedbackField {
        color,
        direction: 0,
        values: guess_values,
        modifiers,
    }
}
