pub mod extremes;
pub mod group;
pub mod temporal;

pub use extremes::select_extremes;
pub use group::{aggregate_developers, aggregate_genres, consensus, rank, Aggregate, RankOrder};
pub use temporal::{PivotGrid, TemporalMatrix, TemporalView};
