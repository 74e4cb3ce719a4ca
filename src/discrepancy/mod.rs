pub mod classification;
pub mod normalization;
pub mod scorer;

pub use classification::{classify, is_extreme};
pub use normalization::normalize_rating;
pub use scorer::{score_record, score_records, CoverageReport, ScoringOutcome};
