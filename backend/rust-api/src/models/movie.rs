use serde::{Deserialize, Serialize};
use std::fmt;

/// MPAA-style rating, ordered from least to most restrictive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Rating {
    Unknown,
    G,
    Pg,
    Pg13,
    R,
    Nc17,
}

impl Rating {
    /// Position in the rating enumeration, used for ordinal distance.
    pub fn ordinal(self) -> i64 {
        match self {
            Rating::Unknown => 0,
            Rating::G => 1,
            Rating::Pg => 2,
            Rating::Pg13 => 3,
            Rating::R => 4,
            Rating::Nc17 => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rating::Unknown => "UNKNOWN",
            Rating::G => "G",
            Rating::Pg => "PG",
            Rating::Pg13 => "PG13",
            Rating::R => "R",
            Rating::Nc17 => "NC17",
        }
    }

    pub fn from_label(label: &str) -> Option<Rating> {
        match label.to_ascii_uppercase().as_str() {
            "UNKNOWN" => Some(Rating::Unknown),
            "G" => Some(Rating::G),
            "PG" => Some(Rating::Pg),
            "PG13" => Some(Rating::Pg13),
            "R" => Some(Rating::R),
            "NC17" => Some(Rating::Nc17),
            _ => None,
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub role: Option<String>,
}

impl Person {
    /// Composite credit used to compare creatives, e.g. "Director: Lynch".
    pub fn creative_credit(&self) -> String {
        format!("{}: {}", self.role.as_deref().unwrap_or("UNK"), self.name)
    }
}

/// A movie as resolved by the catalog. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecord {
    pub id: i64,
    pub title: String,
    pub genres: Vec<String>,
    pub cast: Vec<Person>,
    pub creatives: Vec<Person>,
    /// Non-negative gross in dollars.
    pub box_office: i64,
    /// Release year kept as text for transport; parsed on comparison.
    pub year: String,
    pub rating: Rating,
}

impl MovieRecord {
    pub fn cast_names(&self) -> Vec<String> {
        self.cast.iter().map(|p| p.name.clone()).collect()
    }

    pub fn creative_credits(&self) -> Vec<String> {
        self.creatives.iter().map(Person::creative_credit).collect()
    }
}
