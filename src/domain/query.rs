use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::models::{DiscrepancyType, ScoredGame};

/// Result of a filtered query. `Empty` is a distinct state from a
/// populated result whose values happen to be zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum QueryOutcome<T> {
    Empty,
    Matches(T),
}

impl<T> QueryOutcome<T> {
    pub fn is_empty(&self) -> bool {
        matches!(self, QueryOutcome::Empty)
    }

    pub fn matches(&self) -> Option<&T> {
        match self {
            QueryOutcome::Empty => None,
            QueryOutcome::Matches(value) => Some(value),
        }
    }

    pub fn into_matches(self) -> Option<T> {
        match self {
            QueryOutcome::Empty => None,
            QueryOutcome::Matches(value) => Some(value),
        }
    }
}

impl<U> QueryOutcome<Vec<U>> {
    pub fn from_vec(items: Vec<U>) -> Self {
        if items.is_empty() {
            QueryOutcome::Empty
        } else {
            QueryOutcome::Matches(items)
        }
    }
}

/// Inclusive range of release years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    /// Bounds are reordered so `start <= end` always holds
    pub fn new(a: i32, b: i32) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }
}

/// `None` on any axis means "do not filter"; `Some` of an empty set
/// matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TemporalFilter {
    pub genres: Option<BTreeSet<String>>,
    pub years: Option<YearRange>,
}

impl TemporalFilter {
    pub fn accepts(&self, year: i32, genre: &str) -> bool {
        accepts_genre(&self.genres, genre) && accepts_year(self.years, year)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ScatterFilter {
    pub genres: Option<BTreeSet<String>>,
    pub years: Option<YearRange>,
    pub types: Option<BTreeSet<DiscrepancyType>>,
}

impl ScatterFilter {
    pub fn accepts(&self, game: &ScoredGame) -> bool {
        accepts_genre(&self.genres, &game.genre_name)
            && accepts_year(self.years, game.year)
            && self
                .types
                .as_ref()
                .is_none_or(|types| types.contains(&game.discrepancy_type))
    }
}

fn accepts_genre(genres: &Option<BTreeSet<String>>, genre: &str) -> bool {
    genres.as_ref().is_none_or(|set| set.contains(genre))
}

fn accepts_year(years: Option<YearRange>, year: i32) -> bool {
    years.is_none_or(|range| range.contains(year))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_range_reorders_bounds() {
        let range = YearRange::new(2010, 2000);
        assert_eq!(range.start, 2000);
        assert_eq!(range.end, 2010);
        assert!(range.contains(2000));
        assert!(range.contains(2010));
        assert!(!range.contains(2011));
    }

    #[test]
    fn test_empty_genre_set_matches_nothing() {
        let unfiltered = TemporalFilter::default();
        assert!(unfiltered.accepts(1995, "Puzzle"));

        let nothing = TemporalFilter {
            genres: Some(BTreeSet::new()),
            years: None,
        };
        assert!(!nothing.accepts(1995, "Puzzle"));
    }

    #[test]
    fn test_outcome_from_vec() {
        let empty: QueryOutcome<Vec<i32>> = QueryOutcome::from_vec(vec![]);
        assert!(empty.is_empty());
        assert_eq!(QueryOutcome::from_vec(vec![0]).matches(), Some(&vec![0]));
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let empty: QueryOutcome<Vec<i32>> = QueryOutcome::Empty;
        assert_eq!(serde_json::to_value(&empty).unwrap(), serde_json::json!({"status": "empty"}));

        let hit = QueryOutcome::Matches(vec![1]);
        assert_eq!(
            serde_json::to_value(&hit).unwrap(),
            serde_json::json!({"status": "matches", "data": [1]})
        );
    }
}
