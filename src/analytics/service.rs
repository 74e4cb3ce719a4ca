use anyhow::{anyhow, Context, Result};
use log::info;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use super::snapshot::DiscrepancySnapshot;
use crate::aggregation::RankOrder;
use crate::cache::QueryCache;
use crate::config::settings::AppConfig;
use crate::dataset::load_records;
use crate::domain::{DiscrepancyType, ScatterFilter, TemporalFilter};
use crate::errors::load_context;

/// A snapshot together with the responses memoised against it
struct Generation {
    snapshot: Arc<DiscrepancySnapshot>,
    cache: QueryCache,
}

/// Read-only query surface over the current snapshot. Reloading swaps the
/// snapshot and its cache together.
pub struct AnalyticsService {
    config: AppConfig,
    source: PathBuf,
    current: RwLock<Arc<Generation>>,
}

impl AnalyticsService {
    pub fn new(snapshot: DiscrepancySnapshot, config: AppConfig) -> Self {
        let source = config.data.input_path.clone();
        let generation = Generation {
            snapshot: Arc::new(snapshot),
            cache: QueryCache::new(config.aggregation.query_cache_capacity),
        };
        Self {
            config,
            source,
            current: RwLock::new(Arc::new(generation)),
        }
    }

    pub fn load(config: AppConfig) -> Result<Self> {
        let snapshot = build_snapshot(&config.data.input_path, &config)?;
        Ok(Self::new(snapshot, config))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn snapshot(&self) -> Result<Arc<DiscrepancySnapshot>> {
        Ok(Arc::clone(&self.generation()?.snapshot))
    }

    /// Re-reads the source dataset. On failure the current snapshot stays.
    pub fn reload(&self) -> Result<()> {
        let snapshot = build_snapshot(&self.source, &self.config)?;
        let generation = Arc::new(Generation {
            snapshot: Arc::new(snapshot),
            cache: QueryCache::new(self.config.aggregation.query_cache_capacity),
        });

        let mut current = self
            .current
            .write()
            .map_err(|_| anyhow!("snapshot lock poisoned"))?;
        *current = generation;
        info!("Reloaded snapshot from {}", self.source.display());
        Ok(())
    }

    pub fn overall_stats(&self) -> Result<Arc<Value>> {
        self.query("stats", |s| s.overall_stats())
    }

    pub fn type_distribution(&self) -> Result<Arc<Value>> {
        self.query("distribution", |s| s.type_distribution().counts)
    }

    pub fn ranked_genres(&self, order: RankOrder, n: usize, reliable_only: bool) -> Result<Arc<Value>> {
        let key = format!("genres:{:?}:{}:{}", order, n, reliable_only);
        self.query(&key, |s| s.ranked_genres(order, n, reliable_only))
    }

    pub fn consensus_genres(&self, band: Option<f64>) -> Result<Arc<Value>> {
        let key = format!("consensus:{:?}", band);
        self.query(&key, |s| s.consensus_genres(band))
    }

    pub fn ranked_developers(&self, order: RankOrder, n: usize) -> Result<Arc<Value>> {
        let key = format!("developers:{:?}:{}", order, n);
        self.query(&key, |s| s.ranked_developers(order, n))
    }

    pub fn temporal_matrix(&self, filter: &TemporalFilter) -> Result<Arc<Value>> {
        let key = format!("temporal:{:?}", filter);
        self.query(&key, |s| s.temporal_view(filter))
    }

    pub fn extreme_cases(&self, kind: DiscrepancyType, n: usize) -> Result<Arc<Value>> {
        let key = format!("extremes:{}:{}", kind, n);
        self.query(&key, |s| s.extreme_cases(kind, n))
    }

    pub fn query_scatter(&self, filter: &ScatterFilter) -> Result<Arc<Value>> {
        let key = format!("scatter:{:?}", filter);
        self.query(&key, |s| s.query_scatter(filter))
    }

    pub fn filter_options(&self) -> Result<Arc<Value>> {
        self.query("filters", |s| s.filter_options())
    }

    pub fn coverage(&self) -> Result<Arc<Value>> {
        self.query("coverage", |s| s.coverage().clone())
    }

    fn query<T, F>(&self, key: &str, run: F) -> Result<Arc<Value>>
    where
        T: serde::Serialize,
        F: FnOnce(&DiscrepancySnapshot) -> T,
    {
        let generation = self.generation()?;
        generation
            .cache
            .get_or_compute(key, || run(&generation.snapshot))
    }

    fn generation(&self) -> Result<Arc<Generation>> {
        let current = self
            .current
            .read()
            .map_err(|_| anyhow!("snapshot lock poisoned"))?;
        Ok(Arc::clone(&current))
    }
}

/// Load and score the dataset at `path`
pub fn build_snapshot(path: &Path, config: &AppConfig) -> Result<DiscrepancySnapshot> {
    let dataset = load_records(path).with_context(|| load_context(path))?;
    Ok(DiscrepancySnapshot::build(dataset, config))
}
