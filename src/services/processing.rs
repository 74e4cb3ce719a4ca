use anyhow::Result;
use log::info;
use std::path::PathBuf;

use crate::analytics::build_snapshot;
use crate::config::settings::AppConfig;
use crate::dataset::{export_tables, ExportSummary};

pub struct ProcessingService {
    config: AppConfig,
    output_dir: PathBuf,
}

impl ProcessingService {
    pub fn new(config: AppConfig, output_dir: Option<PathBuf>) -> Self {
        let output_dir = output_dir.unwrap_or_else(|| config.data.output_dir.clone());
        Self { config, output_dir }
    }

    pub fn run(&self) -> Result<ExportSummary> {
        info!("=== Starting Discrepancy Processing ===\n");
        info!(
            "Source: {}, Target: {}",
            self.config.data.input_path.display(),
            self.output_dir.display()
        );

        let snapshot = build_snapshot(&self.config.data.input_path, &self.config)?;
        let coverage = snapshot.coverage();
        info!(
            "  → Scored {} of {} rows ({} excluded)\n",
            coverage.scored,
            coverage.total_rows,
            coverage.excluded()
        );

        let summary = export_tables(&snapshot, &self.config, &self.output_dir)?;

        info!("=== Processing Complete ===");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_process_writes_every_table() {
        let root = std::env::temp_dir().join("game_discrepancy_processing");
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(&root).unwrap();

        let input = root.join("games.csv");
        fs::write(
            &input,
            "id,name,genre_name,year,metacritic,rating\n1,Anthem,Shooter,2019,90,3.0\n2,Celeste,Platformer,2018,70,4.4\n",
        )
        .unwrap();

        let mut config = AppConfig::default();
        config.data.input_path = input;
        let output = root.join("processed");

        let summary = ProcessingService::new(config, Some(output.clone())).run().unwrap();

        assert_eq!(summary.output_dir, output);
        assert_eq!(summary.tables.len(), 5);
        assert!(output.join("manifest.json").exists());
        assert!(output.join("scatter_data.csv").exists());

        fs::remove_dir_all(root).unwrap();
    }
}
