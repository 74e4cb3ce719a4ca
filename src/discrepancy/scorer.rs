use log::{debug, info, warn};
use serde::Serialize;

use super::classification::{classify, is_extreme};
use super::normalization::{discrepancy, is_valid_metacritic, is_valid_rating, normalize_rating};
use crate::config::settings::DiscrepancySettings;
use crate::domain::{GameRecord, ScoredGame};
use crate::errors::{MissingScore, RecordIssue, ScoreField};

/// How many rows made it through scoring, and why the rest did not
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageReport {
    pub total_rows: usize,
    pub scored: usize,
    pub missing_score: usize,
    pub invalid_range: usize,
    pub malformed: usize,
    pub issues: Vec<RecordIssue>,
}

impl CoverageReport {
    pub fn excluded(&self) -> usize {
        self.missing_score + self.invalid_range + self.malformed
    }

    /// Share of rows that were scored, `None` when there were no rows at all
    pub fn coverage_pct(&self) -> Option<f64> {
        if self.total_rows == 0 {
            None
        } else {
            Some(self.scored as f64 / self.total_rows as f64 * 100.0)
        }
    }

    pub fn record(&mut self, issue: RecordIssue) {
        debug!("Excluded row: {}", issue);
        self.total_rows += 1;
        match issue {
            RecordIssue::MissingScore { .. } => self.missing_score += 1,
            RecordIssue::InvalidRange { .. } => self.invalid_range += 1,
            RecordIssue::Malformed { .. } => self.malformed += 1,
        }
        self.issues.push(issue);
    }

    fn record_scored(&mut self) {
        self.total_rows += 1;
        self.scored += 1;
    }
}

pub struct ScoringOutcome {
    pub games: Vec<ScoredGame>,
    pub coverage: CoverageReport,
}

/// Scores a single record, or explains why it cannot be scored
pub fn score_record(
    record: &GameRecord,
    bands: &DiscrepancySettings,
) -> Result<ScoredGame, RecordIssue> {
    let (metacritic, rating) = extract_scores(record)?;

    let normalized_rating = normalize_rating(rating);
    let discrepancy_score = discrepancy(normalized_rating, metacritic);

    Ok(ScoredGame {
        id: record.id,
        name: record.name.clone(),
        genre_name: record.genre_name.clone(),
        developer_name: record.developer_name.clone(),
        year: record.year,
        metacritic,
        rating,
        added: record.added,
        rating_variance: record.rating_variance,
        normalized_rating,
        discrepancy_score,
        discrepancy_type: classify(discrepancy_score, record.rating_variance, bands),
        is_extreme: is_extreme(discrepancy_score, bands),
    })
}

/// Scores every record, continuing past bad rows. `coverage` may already
/// carry rows the loader could not decode.
pub fn score_records(
    records: &[GameRecord],
    bands: &DiscrepancySettings,
    mut coverage: CoverageReport,
) -> ScoringOutcome {
    info!("Scoring {} records", records.len());

    let mut games = Vec::with_capacity(records.len());
    for record in records {
        match score_record(record, bands) {
            Ok(game) => {
                coverage.record_scored();
                games.push(game);
            }
            Err(issue) => coverage.record(issue),
        }
    }

    info!("  → Scored {} of {} rows", coverage.scored, coverage.total_rows);
    if coverage.excluded() > 0 {
        warn!(
            "  → Excluded {} rows ({} missing a score, {} out of range, {} malformed)",
            coverage.excluded(),
            coverage.missing_score,
            coverage.invalid_range,
            coverage.malformed
        );
    }

    ScoringOutcome { games, coverage }
}

fn extract_scores(record: &GameRecord) -> Result<(f64, f64), RecordIssue> {
    let (metacritic, rating) = match (record.metacritic, record.rating) {
        (Some(metacritic), Some(rating)) => (metacritic, rating),
        (None, Some(_)) => return Err(missing(record, MissingScore::Metacritic)),
        (Some(_), None) => return Err(missing(record, MissingScore::Rating)),
        (None, None) => return Err(missing(record, MissingScore::Both)),
    };

    if !is_valid_metacritic(metacritic) {
        return Err(out_of_range(record, ScoreField::Metacritic, metacritic));
    }
    if !is_valid_rating(rating) {
        return Err(out_of_range(record, ScoreField::Rating, rating));
    }
    Ok((metacritic, rating))
}

fn missing(record: &GameRecord, missing: MissingScore) -> RecordIssue {
    RecordIssue::MissingScore {
        id: record.id,
        name: record.name.clone(),
        missing,
    }
}

fn out_of_range(record: &GameRecord, field: ScoreField, value: f64) -> RecordIssue {
    RecordIssue::InvalidRange {
        id: record.id,
        name: record.name.clone(),
        field,
        value,
    }
}
