use ndarray::Array2;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::group::MeanAccumulator;
use crate::domain::{QueryOutcome, ScoredGame, TemporalCell, TemporalFilter};

/// Sparse (year, genre) → mean discrepancy. Only combinations with at least
/// one scored game have a cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemporalMatrix {
    cells: BTreeMap<(i32, String), TemporalCell>,
}

impl TemporalMatrix {
    pub fn build(games: &[ScoredGame]) -> Self {
        let mut groups: BTreeMap<(i32, &str), MeanAccumulator> = BTreeMap::new();
        for game in games {
            groups
                .entry((game.year, game.genre_name.as_str()))
                .or_default()
                .push(game.discrepancy_score);
        }

        let cells = groups
            .into_iter()
            .filter_map(|((year, genre), acc)| {
                let cell = TemporalCell {
                    year,
                    genre_name: genre.to_string(),
                    discrepancy_score: acc.mean()?,
                    game_count: acc.count(),
                };
                Some(((year, genre.to_string()), cell))
            })
            .collect();

        Self { cells }
    }

    pub fn get(&self, year: i32, genre: &str) -> Option<&TemporalCell> {
        self.cells.get(&(year, genre.to_string()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells ordered by year, then genre
    pub fn cells(&self) -> impl Iterator<Item = &TemporalCell> {
        self.cells.values()
    }

    pub fn years(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self.cells.keys().map(|(year, _)| *year).collect();
        years.into_iter().collect()
    }

    pub fn genres(&self) -> Vec<String> {
        let genres: BTreeSet<&str> = self.cells.keys().map(|(_, genre)| genre.as_str()).collect();
        genres.into_iter().map(str::to_string).collect()
    }

    /// Returns a new matrix with only the accepted cells; `self` is untouched
    pub fn query(&self, filter: &TemporalFilter) -> QueryOutcome<TemporalMatrix> {
        let cells: BTreeMap<(i32, String), TemporalCell> = self
            .cells
            .iter()
            .filter(|((year, genre), _)| filter.accepts(*year, genre))
            .map(|(key, cell)| (key.clone(), cell.clone()))
            .collect();

        if cells.is_empty() {
            QueryOutcome::Empty
        } else {
            QueryOutcome::Matches(TemporalMatrix { cells })
        }
    }

    /// Dense genres × years view; `None` marks combinations with no games
    pub fn to_grid(&self) -> PivotGrid {
        let years = self.years();
        let genres = self.genres();

        let year_idx: BTreeMap<i32, usize> = years.iter().enumerate().map(|(i, &y)| (y, i)).collect();
        let genre_idx: BTreeMap<&str, usize> = genres
            .iter()
            .enumerate()
            .map(|(i, g)| (g.as_str(), i))
            .collect();

        let mut values = Array2::<Option<f64>>::from_elem((genres.len(), years.len()), None);
        for cell in self.cells.values() {
            let row = genre_idx[cell.genre_name.as_str()];
            let col = year_idx[&cell.year];
            values[[row, col]] = Some(cell.discrepancy_score);
        }

        PivotGrid {
            genres,
            years,
            values,
        }
    }
}

/// Heatmap-ready pivot: one row per genre, one column per year
#[derive(Debug, Clone, PartialEq)]
pub struct PivotGrid {
    pub genres: Vec<String>,
    pub years: Vec<i32>,
    pub values: Array2<Option<f64>>,
}

impl PivotGrid {
    pub fn value(&self, genre: &str, year: i32) -> Option<f64> {
        let row = self.genres.iter().position(|g| g == genre)?;
        let col = self.years.iter().position(|&y| y == year)?;
        self.values[[row, col]]
    }

    pub fn rows(&self) -> Vec<Vec<Option<f64>>> {
        self.values.rows().into_iter().map(|row| row.to_vec()).collect()
    }
}

/// Serialisable form of a filtered matrix: the sparse cells plus the grid
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalView {
    pub cells: Vec<TemporalCell>,
    pub genres: Vec<String>,
    pub years: Vec<i32>,
    pub grid: Vec<Vec<Option<f64>>>,
    pub total_cells: usize,
}

impl TemporalView {
    pub fn new(matrix: &TemporalMatrix, total_cells: usize) -> Self {
        let grid = matrix.to_grid();
        Self {
            cells: matrix.cells().cloned().collect(),
            grid: grid.rows(),
            genres: grid.genres,
            years: grid.years,
            total_cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DiscrepancyType, YearRange};

    fn game(year: i32, genre: &str, score: f64) -> ScoredGame {
        ScoredGame {
            id: 1,
            name: "Game".to_string(),
            genre_name: genre.to_string(),
            developer_name: String::new(),
            year,
            metacritic: 80.0,
            rating: 4.0,
            added: 0,
            rating_variance: None,
            normalized_rating: 75.0,
            discrepancy_score: score,
            discrepancy_type: DiscrepancyType::Consensus,
            is_extreme: false,
        }
    }

    fn sample() -> Vec<ScoredGame> {
        vec![
            game(1995, "Action", -2.0),
            game(1995, "Action", -4.0),
            game(1996, "Puzzle", 0.0),
            game(2001, "RPG", 3.0),
        ]
    }

    #[test]
    fn test_cells_hold_means() {
        let matrix = TemporalMatrix::build(&sample());

        assert_eq!(matrix.len(), 3);
        let cell = matrix.get(1995, "Action").unwrap();
        assert_eq!(cell.discrepancy_score, -3.0);
        assert_eq!(cell.game_count, 2);
    }

    #[test]
    fn test_missing_combination_is_absent_not_zero() {
        let matrix = TemporalMatrix::build(&sample());

        assert!(matrix.get(1995, "Puzzle").is_none());
        // a real zero is still present
        assert_eq!(matrix.get(1996, "Puzzle").unwrap().discrepancy_score, 0.0);

        let grid = matrix.to_grid();
        assert_eq!(grid.value("Puzzle", 1995), None);
        assert_eq!(grid.value("Puzzle", 1996), Some(0.0));
        assert_eq!(grid.value("Action", 1995), Some(-3.0));
    }

    #[test]
    fn test_filter_to_genre_without_games_in_year() {
        let matrix = TemporalMatrix::build(&sample());
        let filter = TemporalFilter {
            genres: Some(BTreeSet::from(["Puzzle".to_string()])),
            years: Some(YearRange::new(1995, 1995)),
        };

        let outcome = matrix.query(&filter);

        assert_eq!(outcome, QueryOutcome::Empty);
    }

    #[test]
    fn test_query_leaves_matrix_untouched() {
        let matrix = TemporalMatrix::build(&sample());
        let before = matrix.clone();
        let filter = TemporalFilter {
            genres: Some(BTreeSet::from(["Action".to_string(), "RPG".to_string()])),
            years: Some(YearRange::new(1990, 2000)),
        };

        let filtered = matrix.query(&filter).into_matches().unwrap();

        assert_eq!(filtered.len(), 1);
        assert!(filtered.get(1995, "Action").is_some());
        assert_eq!(matrix, before);
        // restartable: same query, same answer
        assert_eq!(matrix.query(&filter).into_matches().unwrap(), filtered);
    }

    #[test]
    fn test_grid_shape() {
        let grid = TemporalMatrix::build(&sample()).to_grid();

        assert_eq!(grid.genres, vec!["Action", "Puzzle", "RPG"]);
        assert_eq!(grid.years, vec![1995, 1996, 2001]);
        assert_eq!(grid.values.dim(), (3, 3));
        assert_eq!(grid.rows()[2], vec![None, None, Some(3.0)]);
    }

    #[test]
    fn test_view_keeps_total() {
        let matrix = TemporalMatrix::build(&sample());
        let view = TemporalView::new(&matrix, 10);

        assert_eq!(view.cells.len(), 3);
        assert_eq!(view.total_cells, 10);
        assert_eq!(view.grid.len(), 3);
    }
}
