use log::info;
use std::collections::{BTreeMap, BTreeSet};

use crate::aggregation::{
    aggregate_developers, aggregate_genres, consensus, rank, select_extremes, RankOrder,
    TemporalMatrix, TemporalView,
};
use crate::config::settings::AppConfig;
use crate::dataset::LoadedDataset;
use crate::discrepancy::{score_records, CoverageReport};
use crate::domain::{
    DeveloperAggregate, DiscrepancyType, ExtremeCase, FilterOptions, GenreAggregate,
    OverallStats, QueryOutcome, ScatterFilter, ScoredGame, TemporalFilter, TypeDistribution,
};

/// Immutable result of one scoring run. Every query reads from it and none
/// of them change it.
#[derive(Debug, Clone)]
pub struct DiscrepancySnapshot {
    games: Vec<ScoredGame>,
    coverage: CoverageReport,
    genres: Vec<GenreAggregate>,
    developers: Vec<DeveloperAggregate>,
    temporal: TemporalMatrix,
    consensus_band: f64,
}

impl DiscrepancySnapshot {
    pub fn build(dataset: LoadedDataset, config: &AppConfig) -> Self {
        let outcome = score_records(&dataset.records, &config.discrepancy, dataset.coverage);
        Self::from_scored(outcome.games, outcome.coverage, config)
    }

    pub fn from_scored(games: Vec<ScoredGame>, coverage: CoverageReport, config: &AppConfig) -> Self {
        let genres = aggregate_genres(&games, config.aggregation.min_genre_support);
        let developers = aggregate_developers(&games, config.aggregation.min_developer_support);
        let temporal = TemporalMatrix::build(&games);

        info!(
            "  → Derived {} genres, {} developers, {} year/genre cells",
            genres.len(),
            developers.len(),
            temporal.len()
        );

        Self {
            games,
            coverage,
            genres,
            developers,
            temporal,
            consensus_band: config.discrepancy.consensus_band,
        }
    }

    pub fn games(&self) -> &[ScoredGame] {
        &self.games
    }

    pub fn coverage(&self) -> &CoverageReport {
        &self.coverage
    }

    pub fn genres(&self) -> &[GenreAggregate] {
        &self.genres
    }

    pub fn developers(&self) -> &[DeveloperAggregate] {
        &self.developers
    }

    pub fn temporal(&self) -> &TemporalMatrix {
        &self.temporal
    }

    pub fn overall_stats(&self) -> OverallStats {
        let count = self.games.len();
        let extreme_count = self.games.iter().filter(|g| g.is_extreme).count();
        let distinct_titles = self.games.iter().map(|g| g.id).collect::<BTreeSet<_>>().len();

        let (mean_discrepancy, extreme_pct) = if count == 0 {
            (None, None)
        } else {
            let total: f64 = self.games.iter().map(|g| g.discrepancy_score).sum();
            (
                Some(total / count as f64),
                Some(extreme_count as f64 / count as f64 * 100.0),
            )
        };

        OverallStats {
            count,
            distinct_titles,
            mean_discrepancy,
            extreme_count,
            extreme_pct,
            distinct_genre_count: self.genres.len(),
        }
    }

    pub fn type_distribution(&self) -> TypeDistribution {
        let mut counts: BTreeMap<DiscrepancyType, usize> =
            DiscrepancyType::ALL.iter().map(|&kind| (kind, 0)).collect();
        for game in &self.games {
            *counts.entry(game.discrepancy_type).or_insert(0) += 1;
        }
        TypeDistribution { counts }
    }

    pub fn top_genres(&self, n: usize) -> Vec<GenreAggregate> {
        rank(&self.genres, RankOrder::Descending, n)
    }

    pub fn bottom_genres(&self, n: usize) -> Vec<GenreAggregate> {
        rank(&self.genres, RankOrder::Ascending, n)
    }

    pub fn ranked_genres(&self, order: RankOrder, n: usize, reliable_only: bool) -> Vec<GenreAggregate> {
        if reliable_only {
            let reliable: Vec<GenreAggregate> =
                self.genres.iter().filter(|g| !g.low_support).cloned().collect();
            rank(&reliable, order, n)
        } else {
            rank(&self.genres, order, n)
        }
    }

    /// `band` defaults to the configured consensus band
    pub fn consensus_genres(&self, band: Option<f64>) -> Vec<GenreAggregate> {
        consensus(&self.genres, band.unwrap_or(self.consensus_band))
    }

    pub fn ranked_developers(&self, order: RankOrder, n: usize) -> Vec<DeveloperAggregate> {
        rank(&self.developers, order, n)
    }

    pub fn temporal_matrix(&self, filter: &TemporalFilter) -> QueryOutcome<TemporalMatrix> {
        self.temporal.query(filter)
    }

    pub fn temporal_view(&self, filter: &TemporalFilter) -> QueryOutcome<TemporalView> {
        match self.temporal.query(filter) {
            QueryOutcome::Empty => QueryOutcome::Empty,
            QueryOutcome::Matches(matrix) => {
                QueryOutcome::Matches(TemporalView::new(&matrix, self.temporal.len()))
            }
        }
    }

    pub fn extreme_cases(&self, kind: DiscrepancyType, n: usize) -> Vec<ExtremeCase> {
        select_extremes(&self.games, kind, n)
    }

    pub fn query_scatter(&self, filter: &ScatterFilter) -> QueryOutcome<Vec<ScoredGame>> {
        QueryOutcome::from_vec(
            self.games
                .iter()
                .filter(|g| filter.accepts(g))
                .cloned()
                .collect(),
        )
    }

    pub fn filter_options(&self) -> FilterOptions {
        let genres: BTreeSet<&str> = self.games.iter().map(|g| g.genre_name.as_str()).collect();
        let types: BTreeSet<DiscrepancyType> = self.games.iter().map(|g| g.discrepancy_type).collect();

        FilterOptions {
            genres: genres.into_iter().map(str::to_string).collect(),
            min_year: self.games.iter().map(|g| g.year).min(),
            max_year: self.games.iter().map(|g| g.year).max(),
            types: types.into_iter().collect(),
        }
    }
}
