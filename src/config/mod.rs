pub mod settings;

pub use settings::{AggregationSettings, AppConfig, DataSettings, DiscrepancySettings, ServerSettings};
