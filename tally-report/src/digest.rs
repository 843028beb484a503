//! The part of a summary that is shared with the advisor.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use tally_core::Summary;

/// Serializable subset of a `Summary`, amounts as JSON numbers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryDigest {
    pub inflow_total: f64,
    pub outflow_total: f64,
    pub savings: f64,
    pub category_totals: BTreeMap<String, f64>,
}

impl SummaryDigest {
    pub fn from_summary(summary: &Summary) -> Self {
        Self {
            inflow_total: as_f64(summary.inflow_total),
            outflow_total: as_f64(summary.outflow_total),
            savings: as_f64(summary.savings),
            category_totals: summary
                .category_totals
                .iter()
                .map(|(k, v)| (k.clone(), as_f64(*v)))
                .collect(),
        }
    }
}

fn as_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or_default()
}
