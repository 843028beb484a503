//! Header normalization and column lookup.
//!
//! Headers are trimmed and lower-cased before matching, so `" Amount"`,
//! `"AMOUNT"` and `"amount"` all name the same column.

use csv::StringRecord;
use tally_core::Columns;

use crate::error::{IngestError, Result};

/// Canonical form of a header cell.
pub fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_lowercase()
}

/// Positions of the recognized columns in a header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub amount: usize,
    pub date: Option<usize>,
    pub flow_type: Option<usize>,
    pub category: Option<usize>,
    pub description: Option<usize>,
}

impl ColumnMap {
    /// Locate columns by normalized name. The first match wins when a name repeats.
    pub fn from_headers(headers: &StringRecord) -> Result<Self> {
        let names: Vec<String> = headers.iter().map(normalize_header).collect();
        let find = |name: &str| names.iter().position(|n| n == name);

        let amount = find("amount").ok_or(IngestError::MissingColumn("amount"))?;

        Ok(Self {
            amount,
            date: find("date"),
            flow_type: find("type"),
            category: find("category"),
            description: find("description"),
        })
    }

    pub fn columns(&self) -> Columns {
        Columns {
            date: self.date.is_some(),
            flow_type: self.flow_type.is_some(),
            category: self.category.is_some(),
            description: self.description.is_some(),
        }
    }
}
