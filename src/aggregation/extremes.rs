use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{DiscrepancyType, ExtremeCase, GameId, ScoredGame};

/// Top `top_n` titles of `kind`, largest magnitude first.
///
/// A title listed under several genres is one case. Ties on magnitude are
/// broken by name, then id, so the order never depends on input order.
pub fn select_extremes(games: &[ScoredGame], kind: DiscrepancyType, top_n: usize) -> Vec<ExtremeCase> {
    let mut by_title: BTreeMap<GameId, (&ScoredGame, BTreeSet<&str>)> = BTreeMap::new();
    for game in games.iter().filter(|g| g.discrepancy_type == kind) {
        by_title
            .entry(game.id)
            .or_insert_with(|| (game, BTreeSet::new()))
            .1
            .insert(game.genre_name.as_str());
    }

    let mut candidates: Vec<(&ScoredGame, BTreeSet<&str>)> = by_title.into_values().collect();
    candidates.sort_by(|(a, _), (b, _)| compare_magnitude(a, b));

    candidates
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(idx, (game, genres))| ExtremeCase {
            rank: idx + 1,
            id: game.id,
            game_name: game.name.clone(),
            genres: genres.into_iter().map(str::to_string).collect(),
            developer_name: game.developer_name.clone(),
            year: game.year,
            metacritic: game.metacritic,
            rating: game.rating,
            discrepancy_score: game.discrepancy_score,
            discrepancy_type: game.discrepancy_type,
        })
        .collect()
}

fn compare_magnitude(a: &ScoredGame, b: &ScoredGame) -> Ordering {
    b.discrepancy_score
        .abs()
        .total_cmp(&a.discrepancy_score.abs())
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(id: i64, name: &str, genre: &str, score: f64, kind: DiscrepancyType) -> ScoredGame {
        ScoredGame {
            id,
            name: name.to_string(),
            genre_name: genre.to_string(),
            developer_name: "Studio".to_string(),
            year: 2012,
            metacritic: 80.0,
            rating: 3.0,
            added: 0,
            rating_variance: None,
            normalized_rating: 50.0,
            discrepancy_score: score,
            discrepancy_type: kind,
            is_extreme: score.abs() >= 4.0,
        }
    }

    fn sample() -> Vec<ScoredGame> {
        use DiscrepancyType::*;
        vec![
            game(1, "Anthem", "Shooter", -30.0, Overhyped),
            game(2, "Undertale", "RPG", 25.0, HiddenGem),
            game(3, "Fallout 76", "RPG", -45.0, Overhyped),
            game(3, "Fallout 76", "Action", -45.0, Overhyped),
            game(4, "Babylon's Fall", "Action", -30.0, Overhyped),
            game(5, "Tetris", "Puzzle", 0.1, Consensus),
        ]
    }

    #[test]
    fn test_ranked_by_magnitude_then_name() {
        let cases = select_extremes(&sample(), DiscrepancyType::Overhyped, 10);

        let names: Vec<&str> = cases.iter().map(|c| c.game_name.as_str()).collect();
        assert_eq!(names, vec!["Fallout 76", "Anthem", "Babylon's Fall"]);
        let ranks: Vec<usize> = cases.iter().map(|c| c.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_multi_genre_title_is_one_case() {
        let cases = select_extremes(&sample(), DiscrepancyType::Overhyped, 1);

        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].id, 3);
        assert_eq!(cases[0].genres, vec!["Action", "RPG"]);
    }

    #[test]
    fn test_only_requested_type() {
        let cases = select_extremes(&sample(), DiscrepancyType::HiddenGem, 10);

        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].game_name, "Undertale");
        assert_eq!(cases[0].discrepancy_type, DiscrepancyType::HiddenGem);
    }

    #[test]
    fn test_stable_across_input_order() {
        let forward = select_extremes(&sample(), DiscrepancyType::Overhyped, 10);

        let mut reversed_input = sample();
        reversed_input.reverse();
        let reversed = select_extremes(&reversed_input, DiscrepancyType::Overhyped, 10);

        assert_eq!(forward, reversed);
        assert_eq!(forward, select_extremes(&sample(), DiscrepancyType::Overhyped, 10));
    }

    #[test]
    fn test_zero_top_n() {
        assert!(select_extremes(&sample(), DiscrepancyType::Overhyped, 0).is_empty());
    }
}
