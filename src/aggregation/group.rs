use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::domain::{DeveloperAggregate, GenreAggregate, ScoredGame};

/// Running sum for an arithmetic mean
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

/// Groups scores under a key; keys come back sorted
pub fn accumulate_by<'a, F>(games: &'a [ScoredGame], key: F) -> BTreeMap<&'a str, MeanAccumulator>
where
    F: Fn(&'a ScoredGame) -> Option<&'a str>,
{
    let mut groups: BTreeMap<&str, MeanAccumulator> = BTreeMap::new();
    for game in games {
        if let Some(k) = key(game) {
            groups.entry(k).or_default().push(game.discrepancy_score);
        }
    }
    groups
}

/// Shared shape of the per-group views so they can be ranked the same way
pub trait Aggregate {
    fn label(&self) -> &str;
    fn score(&self) -> f64;
    fn game_count(&self) -> usize;
    fn low_support(&self) -> bool;
}

impl Aggregate for GenreAggregate {
    fn label(&self) -> &str {
        &self.genre_name
    }

    fn score(&self) -> f64 {
        self.discrepancy_score
    }

    fn game_count(&self) -> usize {
        self.game_count
    }

    fn low_support(&self) -> bool {
        self.low_support
    }
}

impl Aggregate for DeveloperAggregate {
    fn label(&self) -> &str {
        &self.developer_name
    }

    fn score(&self) -> f64 {
        self.discrepancy_score
    }

    fn game_count(&self) -> usize {
        self.game_count
    }

    fn low_support(&self) -> bool {
        self.low_support
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankOrder {
    /// Users furthest above critics first
    #[default]
    Descending,
    /// Critics furthest above users first
    Ascending,
}

/// Ranks by score in `order`; ties go to the larger group, then the
/// label alphabetically.
pub fn rank<A: Aggregate + Clone>(aggregates: &[A], order: RankOrder, n: usize) -> Vec<A> {
    let mut ranked: Vec<A> = aggregates.to_vec();
    ranked.sort_by(|a, b| compare(a, b, order));
    ranked.truncate(n);
    ranked
}

fn compare<A: Aggregate>(a: &A, b: &A, order: RankOrder) -> Ordering {
    let by_score = match order {
        RankOrder::Descending => b.score().total_cmp(&a.score()),
        RankOrder::Ascending => a.score().total_cmp(&b.score()),
    };
    by_score
        .then_with(|| b.game_count().cmp(&a.game_count()))
        .then_with(|| a.label().cmp(b.label()))
}

pub fn aggregate_genres(games: &[ScoredGame], min_support: usize) -> Vec<GenreAggregate> {
    accumulate_by(games, |g| Some(g.genre_name.as_str()))
        .into_iter()
        .filter_map(|(genre, acc)| {
            Some(GenreAggregate {
                genre_name: genre.to_string(),
                discrepancy_score: acc.mean()?,
                game_count: acc.count(),
                low_support: acc.count() < min_support,
            })
        })
        .collect()
}

/// Rows without a developer are left out of the developer view
pub fn aggregate_developers(games: &[ScoredGame], min_support: usize) -> Vec<DeveloperAggregate> {
    accumulate_by(games, |g| {
        let name = g.developer_name.trim();
        (!name.is_empty()).then_some(name)
    })
    .into_iter()
    .filter_map(|(developer, acc)| {
        Some(DeveloperAggregate {
            developer_name: developer.to_string(),
            discrepancy_score: acc.mean()?,
            game_count: acc.count(),
            low_support: acc.count() < min_support,
        })
    })
    .collect()
}

/// Groups whose mean sits within `band` of zero
pub fn consensus<A: Aggregate + Clone>(aggregates: &[A], band: f64) -> Vec<A> {
    aggregates
        .iter()
        .filter(|a| a.score().abs() <= band)
        .cloned()
        .collect()
}
