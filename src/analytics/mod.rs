pub mod service;
pub mod snapshot;

pub use service::{build_snapshot, AnalyticsService};
pub use snapshot::DiscrepancySnapshot;
