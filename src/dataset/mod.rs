pub mod export;
pub mod loader;

pub use export::{export_tables, ExportSummary};
pub use loader::{load_from_reader, load_records, LoadedDataset};
