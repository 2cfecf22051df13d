use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::feedback::Category;

/// Aggregated constraint for one category.
///
/// Serialized untagged so the wire shape stays flat: `{"min","max"}` for
/// ranges, `{"possibleValues"}` for rating candidates, `{"knownValues"}` for
/// confirmed set members. Variant order matters: `Range` has only optional
/// fields and must be tried last on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryHint {
    #[serde(rename_all = "camelCase")]
    Candidates { possible_values: Vec<String> },
    #[serde(rename_all = "camelCase")]
    KnownSet { known_values: Vec<String> },
    Range {
        min: Option<String>,
        max: Option<String>,
    },
}

impl CategoryHint {
    /// Numeric range with stringified bounds; an absent bound is unbounded.
    pub fn range(min: Option<i64>, max: Option<i64>) -> Self {
        CategoryHint::Range {
            min: min.map(|v| v.to_string()),
            max: max.map(|v| v.to_string()),
        }
    }

    /// Collapsed range for an exactly-known value.
    pub fn exact(value: i64) -> Self {
        Self::range(Some(value), Some(value))
    }
}

/// Narrowing constraint state per category for one (user, game) session.
/// A missing key means no constraint is known yet for that category.
pub type HintSnapshot = BTreeMap<Category, CategoryHint>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_hint_wire_shape_is_flat() {
        let hint = CategoryHint::range(Some(1990), None);
        let json = serde_json::to_value(&hint).unwrap();
        assert_eq!(json["min"], "1990");
        assert!(json["max"].is_null());
    }

    #[test]
    fn snapshot_round_trips_by_variant_field_names() {
        let mut snapshot = HintSnapshot::new();
        snapshot.insert(Category::Year, CategoryHint::exact(2001));
        snapshot.insert(
            Category::Rating,
            CategoryHint::Candidates {
                possible_values: vec!["PG13".into(), "R".into()],
            },
        );
        snapshot.insert(
            Category::Cast,
            CategoryHint::KnownSet {
                known_values: vec!["Jodie Foster".into()],
            },
        );

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: HintSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
