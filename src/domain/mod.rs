pub mod aggregates;
pub mod models;
pub mod query;

pub use aggregates::{
    DeveloperAggregate, ExtremeCase, FilterOptions, GenreAggregate, OverallStats, TemporalCell,
    TypeDistribution,
};
pub use models::{DiscrepancyType, GameId, GameRecord, ScoredGame};
pub use query::{QueryOutcome, ScatterFilter, TemporalFilter, YearRange};
