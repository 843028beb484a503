//! Load a transaction CSV into a `TransactionSet`.
//!
//! Expected shape (header names are case/space-insensitive):
//!   date,amount,type,category,description
//!   2025-01-01,50,Outflow,Food,Lunch
//!
//! Only `amount` is required. Rows whose amount does not parse are dropped
//! and counted; rows with a bad date are kept with `date = None`.

use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tally_core::{TransactionRow, TransactionSet};
use tracing::{debug, info};

use crate::cells::{parse_date, CellParser};
use crate::columns::ColumnMap;
use crate::error::Result;

/// Bookkeeping from one load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Data rows seen in the file (header excluded)
    pub rows_read: usize,
    /// Rows dropped because the amount did not parse
    pub dropped_rows: usize,
    /// Kept rows whose date was blank or did not parse
    pub undated_rows: usize,
}

/// A parsed file and its load report
#[derive(Debug, Clone, Default)]
pub struct Loaded {
    pub set: TransactionSet,
    pub report: LoadReport,
}

/// Parse CSV data from any reader.
pub fn load_reader<R: Read>(reader: R) -> Result<Loaded> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let map = ColumnMap::from_headers(rdr.headers()?)?;
    let cells = CellParser::new()?;

    let mut rows = Vec::new();
    let mut report = LoadReport::default();

    for (line, result) in rdr.records().enumerate() {
        let record = result?;
        report.rows_read += 1;

        let amount_raw = record.get(map.amount).unwrap_or("");
        let amount = match cells.amount(amount_raw) {
            Some(a) => a,
            None => {
                debug!(row = line + 1, cell = amount_raw, "dropping row with unparseable amount");
                report.dropped_rows += 1;
                continue;
            }
        };

        let date = text(&record, map.date).as_deref().and_then(parse_date);
        if date.is_none() {
            report.undated_rows += 1;
        }

        rows.push(TransactionRow {
            date,
            amount,
            flow_label: text(&record, map.flow_type),
            category: text(&record, map.category),
            description: text(&record, map.description),
        });
    }

    info!(
        kept = rows.len(),
        dropped = report.dropped_rows,
        undated = report.undated_rows,
        "loaded transactions"
    );

    Ok(Loaded {
        set: TransactionSet::new(rows, map.columns()),
        report,
    })
}

/// Open, fully read and close a CSV file.
pub fn load_path(path: impl AsRef<Path>) -> Result<Loaded> {
    let path = path.as_ref();
    debug!(path = %path.display(), "opening transaction file");
    let file = File::open(path)?;
    load_reader(file)
}

/// Trimmed cell text, `None` for a missing column or blank cell.
fn text(record: &StringRecord, idx: Option<usize>) -> Option<String> {
    let value = record.get(idx?)?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
