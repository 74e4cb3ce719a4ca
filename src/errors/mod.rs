use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::GameId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreField {
    Metacritic,
    Rating,
}

impl fmt::Display for ScoreField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreField::Metacritic => f.write_str("metacritic"),
            ScoreField::Rating => f.write_str("rating"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingScore {
    Metacritic,
    Rating,
    Both,
}

impl fmt::Display for MissingScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingScore::Metacritic => f.write_str("metacritic"),
            MissingScore::Rating => f.write_str("rating"),
            MissingScore::Both => f.write_str("metacritic and rating"),
        }
    }
}

/// A row that could not be scored. The row is dropped and counted; the
/// batch carries on.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordIssue {
    #[error("record {id} ({name}) is missing {missing}")]
    MissingScore {
        id: GameId,
        name: String,
        missing: MissingScore,
    },
    #[error("record {id} ({name}) has {field} = {value} outside its scale")]
    InvalidRange {
        id: GameId,
        name: String,
        field: ScoreField,
        value: f64,
    },
    #[error("line {line}: {message}")]
    Malformed { line: u64, message: String },
}

/// The dataset as a whole could not be supplied; nothing is derived.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset unavailable at {}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("dataset at {} is missing required columns: {}", path.display(), columns.join(", "))]
    MissingColumns { path: PathBuf, columns: Vec<String> },
    #[error("dataset at {} could not be read", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("threshold {name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("consensus band must be non-negative, got {0}")]
    NegativeBand(f64),
    #[error("overhyped threshold {overhyped} overlaps the consensus band ±{band}")]
    OverhypedOverlap { overhyped: f64, band: f64 },
    #[error("hidden gem threshold {hidden_gem} overlaps the consensus band ±{band}")]
    HiddenGemOverlap { hidden_gem: f64, band: f64 },
    #[error("extreme threshold must be positive, got {0}")]
    NonPositiveExtreme(f64),
    #[error("polarizing variance must be non-negative, got {0}")]
    NegativeVariance(f64),
}

/// Add context to dataset loading errors
pub fn load_context(path: &Path) -> String {
    format!("Failed to load dataset from: {}", path.display())
}

/// Add context to export errors
pub fn export_context(table: &str, dir: &Path) -> String {
    format!("Failed to export {} into {}", table, dir.display())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_issue_messages() {
        let issue = RecordIssue::MissingScore {
            id: 7,
            name: "Braid".to_string(),
            missing: MissingScore::Both,
        };
        assert_eq!(issue.to_string(), "record 7 (Braid) is missing metacritic and rating");

        let issue = RecordIssue::InvalidRange {
            id: 8,
            name: "Limbo".to_string(),
            field: ScoreField::Rating,
            value: 7.5,
        };
        assert_eq!(issue.to_string(), "record 8 (Limbo) has rating = 7.5 outside its scale");
    }

    #[test]
    fn test_record_issue_serializes_with_kind() {
        let issue = RecordIssue::Malformed {
            line: 3,
            message: "bad year".to_string(),
        };
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["kind"], "malformed");
        assert_eq!(json["line"], 3);
    }
}
