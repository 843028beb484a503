//! Error types for CSV ingestion

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("CSV must include an `{0}` column")]
    MissingColumn(&'static str),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, IngestError>;
