//! Transaction rows and the ordered set built from one CSV load

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One parsed transaction row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRow {
    /// Calendar date, `None` when the cell was blank or unparseable
    pub date: Option<NaiveDate>,
    /// Signed amount as written in the file
    pub amount: Decimal,
    /// Raw `type` label (e.g. "Inflow", "debit"), trimmed
    pub flow_label: Option<String>,
    /// Free-text category label, trimmed
    pub category: Option<String>,
    pub description: Option<String>,
}

impl TransactionRow {
    /// Row with only an amount set
    pub fn new(amount: Decimal) -> Self {
        Self {
            date: None,
            amount,
            flow_label: None,
            category: None,
            description: None,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_flow_label(mut self, label: impl Into<String>) -> Self {
        self.flow_label = Some(label.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Get the absolute amount
    pub fn abs_amount(&self) -> Decimal {
        self.amount.abs()
    }
}

/// Which optional columns the source file carried
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Columns {
    pub date: bool,
    pub flow_type: bool,
    pub category: bool,
    pub description: bool,
}

/// Ordered rows from a single load, in file order.
///
/// Every row holds a numeric amount; rows whose amount did not parse never
/// make it in here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TransactionSet {
    rows: Vec<TransactionRow>,
    columns: Columns,
}

impl TransactionSet {
    pub fn new(rows: Vec<TransactionRow>, columns: Columns) -> Self {
        Self { rows, columns }
    }

    pub fn rows(&self) -> &[TransactionRow] {
        &self.rows
    }

    pub fn columns(&self) -> Columns {
        self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<TransactionRow> for TransactionSet {
    fn from_iter<I: IntoIterator<Item = TransactionRow>>(iter: I) -> Self {
        let rows: Vec<TransactionRow> = iter.into_iter().collect();
        let columns = Columns {
            date: rows.iter().any(|r| r.date.is_some()),
            flow_type: rows.iter().any(|r| r.flow_label.is_some()),
            category: rows.iter().any(|r| r.category.is_some()),
            description: rows.iter().any(|r| r.description.is_some()),
        };
        Self { rows, columns }
    }
}
