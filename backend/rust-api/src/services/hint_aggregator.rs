use std::collections::BTreeSet;

use crate::config::{GameConfig, NumericThresholds};
use crate::models::{
    Category, CategoryHint, Color, FeedbackRecord, HintSnapshot, MovieRecord, Rating,
    BOLD_MODIFIER,
};

/// Pure fold of a session's ordered feedback history into per-category
/// narrowing hints.
///
/// Each rule only tightens or preserves what earlier guesses established, so
/// successive snapshots never loosen: numeric bounds shrink, rating
/// candidates shrink, known set members accumulate.
#[derive(Debug, Clone)]
pub struct HintAggregator {
    config: GameConfig,
}

impl HintAggregator {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    /// Folds `history` (strict submission order) against `target`.
    /// Categories nothing has narrowed yet are absent from the result.
    pub fn aggregate(&self, history: &[FeedbackRecord], target: &MovieRecord) -> HintSnapshot {
        let mut snapshot = HintSnapshot::new();

        if history.is_empty() {
            return snapshot;
        }

        if let Ok(target_year) = target.year.trim().parse::<i64>() {
            if let Some(hint) =
                range_hint(history, Category::Year, &self.config.year, target_year)
            {
                snapshot.insert(Category::Year, hint);
            }
        } else {
            tracing::warn!(year = %target.year, "skipping year hints: non-numeric target year");
        }

        if let Some(hint) = range_hint(
            history,
            Category::BoxOffice,
            &self.config.box_office,
            target.box_office,
        ) {
            snapshot.insert(Category::BoxOffice, hint);
        }

        if let Some(hint) = rating_hint(history, &self.config.rating_scale, target.rating) {
            snapshot.insert(Category::Rating, hint);
        }

        let set_categories = [
            (Category::Genre, target.genres.clone()),
            (Category::Cast, target.cast_names()),
            (Category::Creatives, target.creative_credits()),
        ];
        for (category, target_values) in set_categories {
            if let Some(hint) = known_set_hint(history, category, target_values) {
                snapshot.insert(category, hint);
            }
        }

        snapshot
    }
}

/// Intersects the exclusion intervals implied by each numeric feedback entry.
///
/// Intervals invert the compare thresholds: a ±2 arrow puts the target past
/// the double-arrow threshold, a ±1 arrow between the single and double
/// thresholds, and a directionless entry within the single-arrow threshold
/// (within the yellow threshold when colored yellow).
fn range_hint(
    history: &[FeedbackRecord],
    category: Category,
    thresholds: &NumericThresholds,
    target_value: i64,
) -> Option<CategoryHint> {
    let mut min_bound: Option<i64> = None;
    let mut max_bound: Option<i64> = None;

    for record in history {
        let Some(field) = record.get(&category) else {
            continue;
        };

        if field.color == Color::Green {
            // Exact value known; later entries cannot loosen this.
            return Some(CategoryHint::exact(target_value));
        }

        let Some(guess) = field.values.first().and_then(|v| v.trim().parse::<i64>().ok())
        else {
            continue;
        };

        let (new_min, new_max) = match field.direction {
            2 => (Some(guess + thresholds.double_arrow + 1), None),
            1 => (
                Some(guess + thresholds.single_arrow + 1),
                Some(guess + thresholds.double_arrow),
            ),
            -1 => (
                Some(guess - thresholds.double_arrow),
                Some(guess - thresholds.single_arrow - 1),
            ),
            -2 => (None, Some(guess - thresholds.double_arrow - 1)),
            _ => {
                if field.color == Color::Yellow {
                    (
                        Some(guess - (thresholds.yellow - 1)),
                        Some(guess + (thresholds.yellow - 1)),
                    )
                } else {
                    (
                        Some(guess - thresholds.single_arrow),
                        Some(guess + thresholds.single_arrow),
                    )
                }
            }
        };

        if let Some(m) = new_min {
            min_bound = Some(min_bound.map_or(m, |cur| cur.max(m)));
        }
        if let Some(m) = new_max {
            max_bound = Some(max_bound.map_or(m, |cur| cur.min(m)));
        }
    }

    if min_bound.is_none() && max_bound.is_none() {
        return None;
    }

    // Years and grosses cannot be negative.
    if let Some(m) = min_bound {
        if m < 0 {
            min_bound = Some(0);
        }
    }

    Some(CategoryHint::range(min_bound, max_bound))
}

/// Narrows the ordered rating scale by positional neighbors: grey removes
/// the guess and both neighbors, yellow keeps only the neighbors.
fn rating_hint(
    history: &[FeedbackRecord],
    scale: &[Rating],
    target_rating: Rating,
) -> Option<CategoryHint> {
    let mut possible: Vec<Rating> = scale.to_vec();

    for record in history {
        let Some(field) = record.get(&Category::Rating) else {
            continue;
        };

        if field.color == Color::Green {
            return Some(CategoryHint::Candidates {
                possible_values: vec![target_rating.label().to_string()],
            });
        }

        let Some(guessed) = field.values.first().and_then(|v| Rating::from_label(v)) else {
            continue;
        };
        let Some(position) = scale.iter().position(|r| *r == guessed) else {
            continue;
        };

        let mut neighbors: Vec<Rating> = Vec::new();
        if position > 0 {
            neighbors.push(scale[position - 1]);
        }
        if position + 1 < scale.len() {
            neighbors.push(scale[position + 1]);
        }

        match field.color {
            Color::Grey => {
                possible.retain(|r| *r != guessed && !neighbors.contains(r));
            }
            Color::Yellow => {
                possible.retain(|r| neighbors.contains(r));
            }
            Color::Green => unreachable!(),
        }
    }

    if possible.is_empty() || possible.len() == scale.len() {
        return None;
    }

    Some(CategoryHint::Candidates {
        possible_values: possible.iter().map(|r| r.label().to_string()).collect(),
    })
}

/// Accumulates every value confirmed shared with the target; a full match
/// reveals the target's complete list at once.
fn known_set_hint(
    history: &[FeedbackRecord],
    category: Category,
    target_values: Vec<String>,
) -> Option<CategoryHint> {
    let mut known: BTreeSet<String> = BTreeSet::new();

    for record in history {
        let Some(field) = record.get(&category) else {
            continue;
        };

        if field.color == Color::Green {
            return Some(CategoryHint::KnownSet {
                known_values: target_values,
            });
        }

        for (value, tags) in &field.modifiers {
            if tags.iter().any(|t| t == BOLD_MODIFIER) {
                known.insert(value.clone());
            }
        }
    }

    if known.is_empty() {
        return None;
    }

    Some(CategoryHint::KnownSet {
        known_values: known.into_iter().collect(),
    })
}
