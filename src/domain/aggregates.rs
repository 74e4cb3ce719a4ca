use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::models::{DiscrepancyType, GameId};

/// Mean discrepancy of every scored row under one genre
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreAggregate {
    pub genre_name: String,
    pub discrepancy_score: f64,
    pub game_count: usize,
    /// Fewer members than the configured minimum support
    pub low_support: bool,
}

/// Mean discrepancy of every scored row under one developer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeveloperAggregate {
    pub developer_name: String,
    pub discrepancy_score: f64,
    pub game_count: usize,
    pub low_support: bool,
}

/// One populated (year, genre) cell; absent cells are never materialised
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalCell {
    pub year: i32,
    pub genre_name: String,
    pub discrepancy_score: f64,
    pub game_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtremeCase {
    pub rank: usize,
    pub id: GameId,
    pub game_name: String,
    /// Every genre the title was listed under, sorted
    pub genres: Vec<String>,
    pub developer_name: String,
    pub year: i32,
    pub metacritic: f64,
    pub rating: f64,
    pub discrepancy_score: f64,
    #[serde(rename = "type")]
    pub discrepancy_type: DiscrepancyType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    pub count: usize,
    pub distinct_titles: usize,
    /// `None` when nothing was scored
    pub mean_discrepancy: Option<f64>,
    pub extreme_count: usize,
    pub extreme_pct: Option<f64>,
    pub distinct_genre_count: usize,
}

/// Row count per discrepancy type; every type is present, zero or not
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDistribution {
    pub counts: BTreeMap<DiscrepancyType, usize>,
}

impl TypeDistribution {
    pub fn count(&self, kind: DiscrepancyType) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub genres: Vec<String>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub types: Vec<DiscrepancyType>,
}
