use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::analytics::DiscrepancySnapshot;
use crate::config::settings::{AppConfig, DiscrepancySettings};
use crate::discrepancy::CoverageReport;
use crate::domain::{DiscrepancyType, ExtremeCase};
use crate::errors::export_context;

pub const SCATTER_FILE: &str = "scatter_data.csv";
pub const GENRE_FILE: &str = "genre_discrepancies.csv";
pub const DEVELOPER_FILE: &str = "developer_discrepancies.csv";
pub const TEMPORAL_FILE: &str = "temporal_discrepancies.csv";
pub const EXTREME_FILE: &str = "extreme_cases.csv";
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Serialize)]
struct ExtremeCaseRow<'a> {
    #[serde(rename = "type")]
    discrepancy_type: DiscrepancyType,
    rank: usize,
    id: i64,
    game_name: &'a str,
    genre_name: String,
    developer_name: &'a str,
    year: i32,
    metacritic: f64,
    rating: f64,
    discrepancy_score: f64,
}

impl<'a> From<&'a ExtremeCase> for ExtremeCaseRow<'a> {
    fn from(case: &'a ExtremeCase) -> Self {
        Self {
            discrepancy_type: case.discrepancy_type,
            rank: case.rank,
            id: case.id,
            game_name: &case.game_name,
            genre_name: case.genres.join("|"),
            developer_name: &case.developer_name,
            year: case.year,
            metacritic: case.metacritic,
            rating: case.rating,
            discrepancy_score: case.discrepancy_score,
        }
    }
}

#[derive(Debug, Serialize)]
struct Manifest<'a> {
    generated_at: DateTime<Utc>,
    thresholds: &'a DiscrepancySettings,
    coverage: &'a CoverageReport,
    tables: Vec<TableSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSummary {
    pub file: String,
    pub rows: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub output_dir: PathBuf,
    pub tables: Vec<TableSummary>,
}

/// Writes every derived table into a staging directory next to
/// `output_dir`, then renames each file into place with the manifest last.
/// Other files in `output_dir` are left alone.
pub fn export_tables(snapshot: &DiscrepancySnapshot, config: &AppConfig, output_dir: &Path) -> Result<ExportSummary> {
    let staging = staging_dir(output_dir)?;
    if staging.exists() {
        fs::remove_dir_all(&staging)
            .with_context(|| format!("Failed to clear staging directory {}", staging.display()))?;
    }
    fs::create_dir_all(&staging)
        .with_context(|| format!("Failed to create staging directory {}", staging.display()))?;

    let published = stage_tables(snapshot, config, &staging)
        .and_then(|tables| publish(&staging, output_dir, &tables).map(|()| tables));
    if let Err(e) = fs::remove_dir_all(&staging) {
        warn!("Failed to remove staging directory {}: {}", staging.display(), e);
    }
    let tables = published?;
    info!("Successfully swapped processed tables into {}", output_dir.display());

    Ok(ExportSummary {
        output_dir: output_dir.to_path_buf(),
        tables,
    })
}

fn stage_tables(snapshot: &DiscrepancySnapshot, config: &AppConfig, staging: &Path) -> Result<Vec<TableSummary>> {
    let tables = write_tables(snapshot, config, staging)?;
    write_manifest(snapshot, config, staging, &tables)?;
    Ok(tables)
}

fn publish(staging: &Path, output_dir: &Path, tables: &[TableSummary]) -> Result<()> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let files = tables.iter().map(|t| t.file.as_str()).chain([MANIFEST_FILE]);
    for file in files {
        fs::rename(staging.join(file), output_dir.join(file))
            .with_context(|| export_context(file, output_dir))?;
    }
    Ok(())
}

fn write_tables(snapshot: &DiscrepancySnapshot, config: &AppConfig, dir: &Path) -> Result<Vec<TableSummary>> {
    let top_n = config.aggregation.default_extreme_cases;
    let extremes: Vec<ExtremeCase> = [DiscrepancyType::Overhyped, DiscrepancyType::HiddenGem]
        .into_iter()
        .flat_map(|kind| snapshot.extreme_cases(kind, top_n))
        .collect();

    Ok(vec![
        write_csv(dir, SCATTER_FILE, snapshot.games())?,
        write_csv(dir, GENRE_FILE, snapshot.genres())?,
        write_csv(dir, DEVELOPER_FILE, snapshot.developers())?,
        write_csv(dir, TEMPORAL_FILE, snapshot.temporal().cells())?,
        write_csv(dir, EXTREME_FILE, extremes.iter().map(ExtremeCaseRow::from))?,
    ])
}

fn write_csv<I>(dir: &Path, file: &str, rows: I) -> Result<TableSummary>
where
    I: IntoIterator,
    I::Item: Serialize,
{
    let path = dir.join(file);
    let mut writer = csv::Writer::from_path(&path).with_context(|| export_context(file, dir))?;

    let mut count = 0;
    for row in rows {
        writer.serialize(row).with_context(|| export_context(file, dir))?;
        count += 1;
    }
    writer.flush().with_context(|| export_context(file, dir))?;

    info!("  → Wrote {} rows to {}", count, file);
    Ok(TableSummary {
        file: file.to_string(),
        rows: count,
    })
}

fn write_manifest(
    snapshot: &DiscrepancySnapshot,
    config: &AppConfig,
    dir: &Path,
    tables: &[TableSummary],
) -> Result<()> {
    let manifest = Manifest {
        generated_at: Utc::now(),
        thresholds: &config.discrepancy,
        coverage: snapshot.coverage(),
        tables: tables.to_vec(),
    };
    let json = serde_json::to_string_pretty(&manifest)?;
    fs::write(dir.join(MANIFEST_FILE), json).with_context(|| export_context(MANIFEST_FILE, dir))?;
    Ok(())
}

fn staging_dir(output_dir: &Path) -> Result<PathBuf> {
    let Some(name) = output_dir.file_name() else {
        bail!(
            "Output directory {} must end in a directory name",
            output_dir.display()
        );
    };
    let mut staged = name.to_os_string();
    staged.push(".tmp");
    Ok(output_dir.parent().unwrap_or(Path::new("")).join(staged))
}
