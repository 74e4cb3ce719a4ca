use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;

/// Classification bands on the common 0-100 scale. The defaults are
/// illustrative; override them from a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscrepancySettings {
    pub consensus_band: f64,
    pub overhyped_threshold: f64,
    pub hidden_gem_threshold: f64,
    /// User rating variance at or above which a non-consensus title is polarizing
    pub polarizing_variance: f64,
    pub extreme_threshold: f64,
}

impl Default for DiscrepancySettings {
    fn default() -> Self {
        Self {
            consensus_band: 0.5,
            overhyped_threshold: -1.5,
            hidden_gem_threshold: 1.5,
            polarizing_variance: 2.0,
            extreme_threshold: 4.0,
        }
    }
}

impl DiscrepancySettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("consensus_band", self.consensus_band),
            ("overhyped_threshold", self.overhyped_threshold),
            ("hidden_gem_threshold", self.hidden_gem_threshold),
            ("polarizing_variance", self.polarizing_variance),
            ("extreme_threshold", self.extreme_threshold),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name, value });
            }
        }

        if self.consensus_band < 0.0 {
            return Err(ConfigError::NegativeBand(self.consensus_band));
        }
        if self.overhyped_threshold > -self.consensus_band {
            return Err(ConfigError::OverhypedOverlap {
                overhyped: self.overhyped_threshold,
                band: self.consensus_band,
            });
        }
        if self.hidden_gem_threshold < self.consensus_band {
            return Err(ConfigError::HiddenGemOverlap {
                hidden_gem: self.hidden_gem_threshold,
                band: self.consensus_band,
            });
        }
        if self.extreme_threshold <= 0.0 {
            return Err(ConfigError::NonPositiveExtreme(self.extreme_threshold));
        }
        if self.polarizing_variance < 0.0 {
            return Err(ConfigError::NegativeVariance(self.polarizing_variance));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationSettings {
    pub min_genre_support: usize,
    pub min_developer_support: usize,
    pub default_top_genres: usize,
    pub default_top_developers: usize,
    pub default_extreme_cases: usize,
    pub query_cache_capacity: usize,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            min_genre_support: 5,
            min_developer_support: 5,
            default_top_genres: 15,
            default_top_developers: 15,
            default_extreme_cases: 10,
            query_cache_capacity: 256,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("data/raw/games.csv"),
            output_dir: PathBuf::from("data/processed"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Bearer token for the reload endpoint; reload is disabled without one
    pub admin_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub discrepancy: DiscrepancySettings,
    pub aggregation: AggregationSettings,
    pub data: DataSettings,
    pub server: ServerSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, then the optional JSON file, then environment overrides
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => Self::new(),
        };
        let config = config.with_env_overrides(|key| std::env::var(key).ok());
        config.discrepancy.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("DATA_PATH") {
            self.data.input_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup("OUTPUT_DIR") {
            self.data.output_dir = PathBuf::from(dir);
        }
        if let Some(token) = lookup("ADMIN_TOKEN").filter(|t| !t.is_empty()) {
            self.server.admin_token = Some(token);
        }
        self
    }
}
