//! Inflow/outflow classification.
//!
//! An explicit `type` label wins when the row has one; otherwise the sign of
//! the amount decides. Zero-amount rows without a label belong to neither side.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

use crate::config::{SummarizerConfig, UnrecognizedLabels};
use crate::transaction::TransactionRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flow {
    #[serde(rename = "inflow")]
    Inflow,
    #[serde(rename = "outflow")]
    Outflow,
}

/// Classify a single row, or `None` when it counts toward neither total.
pub fn classify(row: &TransactionRow, config: &SummarizerConfig) -> Option<Flow> {
    let label = row
        .flow_label
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty());

    match label {
        Some(l) if config.is_inflow_label(l) => Some(Flow::Inflow),
        Some(l) if config.is_outflow_label(l) => Some(Flow::Outflow),
        Some(l) => match config.unrecognized_labels {
            UnrecognizedLabels::Exclude => {
                debug!(label = l, amount = %row.amount, "unrecognized type label, row excluded");
                None
            }
            UnrecognizedLabels::BySign => by_sign(row),
        },
        None => by_sign(row),
    }
}

fn by_sign(row: &TransactionRow) -> Option<Flow> {
    match row.amount.cmp(&Decimal::ZERO) {
        Ordering::Greater => Some(Flow::Inflow),
        Ordering::Less => Some(Flow::Outflow),
        Ordering::Equal => None,
    }
}

/// Rows split by flow. Not necessarily exhaustive: see `unclassified`.
#[derive(Debug, Default)]
pub struct Partition<'a> {
    pub inflow: Vec<&'a TransactionRow>,
    pub outflow: Vec<&'a TransactionRow>,
    pub unclassified: Vec<&'a TransactionRow>,
}

pub fn partition<'a>(rows: &'a [TransactionRow], config: &SummarizerConfig) -> Partition<'a> {
    let mut out = Partition::default();
    for row in rows {
        match classify(row, config) {
            Some(Flow::Inflow) => out.inflow.push(row),
            Some(Flow::Outflow) => out.outflow.push(row),
            None => out.unclassified.push(row),
        }
    }
    out
}
