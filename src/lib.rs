pub mod aggregation;
pub mod analytics;
pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod discrepancy;
pub mod domain;
pub mod errors;
pub mod services;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;
use log::info;
use std::path::{Path, PathBuf};

use crate::analytics::build_snapshot;
use crate::config::settings::AppConfig;
use crate::services::processing::ProcessingService;
use crate::services::report::render_report;
use crate::services::server::ServerService;

pub fn interpret() -> Cli {
    Cli::parse()
}

/// Config file, then environment, then `--input`
pub fn load_config(config_path: Option<&Path>, input: Option<&Path>) -> Result<AppConfig> {
    let mut config = AppConfig::load(config_path)?;
    if let Some(input) = input {
        config.data.input_path = input.to_path_buf();
    }
    Ok(config)
}

pub fn handle_serve(port: u16, config: AppConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_process(config: AppConfig, output: Option<PathBuf>) -> Result<()> {
    let service = ProcessingService::new(config, output);
    let summary = service.run()?;
    for table in &summary.tables {
        info!("  {} ({} rows)", table.file, table.rows);
    }
    Ok(())
}

pub fn handle_report(config: AppConfig, top: usize) -> Result<()> {
    let snapshot = build_snapshot(&config.data.input_path, &config)?;
    print!("{}", render_report(&snapshot, top));
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_flag_overrides_config() {
        let config = load_config(None, Some(Path::new("other.csv"))).unwrap();
        assert_eq!(config.data.input_path, PathBuf::from("other.csv"));
    }
}
