//! Derived summary of a transaction set

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::aggregate::{group_sum, magnitude, savings, total};
use crate::classify::partition;
use crate::config::SummarizerConfig;
use crate::transaction::TransactionSet;

/// Aggregate view of one `TransactionSet`. Recomputed on every load.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub total_count: usize,
    /// Signed sum of every amount
    pub total_amount: Decimal,
    /// Always non-negative
    pub inflow_total: Decimal,
    /// Always non-negative
    pub outflow_total: Decimal,
    pub savings: Decimal,
    /// Rows counted in neither inflow nor outflow
    pub unclassified_count: usize,
    pub category_totals: BTreeMap<String, Decimal>,
}

impl Summary {
    /// Category totals sorted by descending magnitude, ties by name.
    pub fn by_magnitude(&self) -> Vec<(String, Decimal)> {
        let mut out: Vec<(String, Decimal)> = self
            .category_totals
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        out.sort_by(|a, b| b.1.abs().cmp(&a.1.abs()).then_with(|| a.0.cmp(&b.0)));
        out
    }
}

pub fn summarize(set: &TransactionSet, config: &SummarizerConfig) -> Summary {
    let rows = set.rows();
    let parts = partition(rows, config);

    let inflow_total = magnitude(parts.inflow.iter().copied());
    let outflow_total = magnitude(parts.outflow.iter().copied());

    let summary = Summary {
        total_count: rows.len(),
        total_amount: total(rows),
        inflow_total,
        outflow_total,
        savings: savings(inflow_total, outflow_total, config.clamp_savings_at_zero),
        unclassified_count: parts.unclassified.len(),
        category_totals: group_sum(rows, &config.uncategorized_bucket_name),
    };

    debug!(
        rows = summary.total_count,
        unclassified = summary.unclassified_count,
        inflow = %summary.inflow_total,
        outflow = %summary.outflow_total,
        "summarized transactions"
    );
    summary
}
