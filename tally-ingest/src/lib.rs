//! tally-ingest: transaction CSV loading, header normalization and the dataset store.

pub mod cells;
pub mod columns;
pub mod error;
pub mod loader;
pub mod store;

pub use columns::{normalize_header, ColumnMap};
pub use error::IngestError;
pub use loader::{load_path, load_reader, LoadReport, Loaded};
pub use store::DatasetStore;
