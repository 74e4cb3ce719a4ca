use log::{info, warn};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::discrepancy::CoverageReport;
use crate::domain::GameRecord;
use crate::errors::{DatasetError, RecordIssue};

const REQUIRED_COLUMNS: [&str; 6] = ["id", "name", "genre_name", "year", "metacritic", "rating"];

/// Decoded rows plus the rows that could not be decoded
pub struct LoadedDataset {
    pub records: Vec<GameRecord>,
    pub coverage: CoverageReport,
}

pub fn load_records(path: &Path) -> Result<LoadedDataset, DatasetError> {
    let file = File::open(path).map_err(|e| DatasetError::Unavailable {
        path: path.to_path_buf(),
        source: e,
    })?;
    let dataset = load_from_reader(file, path)?;
    info!(
        "Loaded {} records from {}",
        dataset.records.len(),
        path.display()
    );
    Ok(dataset)
}

/// `origin` is only used in error messages
pub fn load_from_reader<R: Read>(reader: R, origin: &Path) -> Result<LoadedDataset, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| unreadable(origin, e))?
        .clone();
    check_columns(&headers, origin)?;

    let mut records = Vec::new();
    let mut coverage = CoverageReport::default();

    for (idx, row) in csv_reader.deserialize::<GameRecord>().enumerate() {
        match row {
            Ok(record) => records.push(record),
            Err(e) if e.is_io_error() => return Err(unreadable(origin, e)),
            Err(e) => {
                // header is line 1
                let line = e.position().map(|p| p.line()).unwrap_or(idx as u64 + 2);
                coverage.record(RecordIssue::Malformed {
                    line,
                    message: e.to_string(),
                });
            }
        }
    }

    if coverage.malformed > 0 {
        warn!(
            "  → {} rows in {} could not be decoded",
            coverage.malformed,
            origin.display()
        );
    }

    Ok(LoadedDataset { records, coverage })
}

fn check_columns(headers: &csv::StringRecord, origin: &Path) -> Result<(), DatasetError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DatasetError::MissingColumns {
            path: origin.to_path_buf(),
            columns: missing,
        })
    }
}

fn unreadable(origin: &Path, source: csv::Error) -> DatasetError {
    DatasetError::Unreadable {
        path: PathBuf::from(origin),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
id,name,genre_name,developer_name,year,metacritic,rating,added,rating_variance
1,Anthem,Shooter,BioWare,2019,59,2.1,1200,
2,Hades,Action,Supergiant Games,2020,,4.6,9000,0.4
3,Celeste,Platformer,Maddy Makes Games,2018,92,4.4,5000,
4,Broken,Action,Nobody,not-a-year,70,3.0,10,
";

    fn origin() -> &'static Path {
        Path::new("memory.csv")
    }

    #[test]
    fn test_loads_rows_with_optional_scores() {
        let dataset = load_from_reader(SAMPLE.as_bytes(), origin()).unwrap();

        assert_eq!(dataset.records.len(), 3);
        let hades = &dataset.records[1];
        assert_eq!(hades.metacritic, None);
        assert_eq!(hades.rating, Some(4.6));
        assert_eq!(hades.rating_variance, Some(0.4));
        assert_eq!(dataset.records[0].developer_name, "BioWare");
    }

    #[test]
    fn test_malformed_row_is_counted_not_fatal() {
        let dataset = load_from_reader(SAMPLE.as_bytes(), origin()).unwrap();

        assert_eq!(dataset.coverage.malformed, 1);
        assert_eq!(dataset.coverage.total_rows, 1);
        assert!(matches!(
            dataset.coverage.issues[0],
            RecordIssue::Malformed { line: 5, .. }
        ));
    }

    #[test]
    fn test_missing_columns_abort() {
        let data = "id,name,year\n1,Anthem,2019\n";
        let err = load_from_reader(data.as_bytes(), origin()).err().unwrap();

        match err {
            DatasetError::MissingColumns { columns, .. } => {
                assert!(columns.contains(&"metacritic".to_string()));
                assert!(columns.contains(&"genre_name".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let path = std::env::temp_dir().join("game_discrepancy_no_such_file.csv");
        let err = load_records(&path).err().unwrap();

        assert!(matches!(err, DatasetError::Unavailable { .. }));
    }
}
