//! tally-core: transaction model, inflow/outflow classifier, aggregator and summarizer

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod summary;
pub mod transaction;

pub use classify::{classify, partition, Flow, Partition};
pub use config::{SummarizerConfig, UnrecognizedLabels};
pub use summary::{summarize, Summary};
pub use transaction::{Columns, TransactionRow, TransactionSet};

pub use rust_decimal::Decimal;
