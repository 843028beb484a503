//! Chart-ready series derived from a summary. Rendering is left to the caller.

use rust_decimal::Decimal;
use serde::Serialize;
use tally_core::aggregate::savings;
use tally_core::Summary;

use crate::category_table::CategoryTable;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarPoint {
    pub label: String,
    pub value: Decimal,
}

/// One bar per category, in table order.
pub fn bar_series(table: &CategoryTable) -> Vec<BarPoint> {
    table
        .rows()
        .iter()
        .map(|r| BarPoint {
            label: r.category.clone(),
            value: r.amount,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SliceKind {
    Outflow,
    Savings,
}

impl SliceKind {
    pub fn label(&self) -> &'static str {
        match self {
            SliceKind::Outflow => "Outflow",
            SliceKind::Savings => "Savings",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub kind: SliceKind,
    pub value: Decimal,
}

/// Where the inflow went: spent vs. kept.
///
/// Savings is floored at zero regardless of the summarizer setting since a
/// pie cannot hold a negative slice. Zero-valued slices are left out.
pub fn flow_slices(summary: &Summary) -> Vec<Slice> {
    let kept = savings(summary.inflow_total, summary.outflow_total, true);
    [
        Slice {
            kind: SliceKind::Outflow,
            value: summary.outflow_total,
        },
        Slice {
            kind: SliceKind::Savings,
            value: kept,
        },
    ]
    .into_iter()
    .filter(|s| s.value > Decimal::ZERO)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(inflow: i64, outflow: i64) -> Summary {
        Summary {
            inflow_total: Decimal::from(inflow),
            outflow_total: Decimal::from(outflow),
            savings: Decimal::from(inflow - outflow),
            ..Summary::default()
        }
    }

    #[test]
    fn test_slices_split_inflow() {
        let slices = flow_slices(&summary(1000, 170));
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].kind, SliceKind::Outflow);
        assert_eq!(slices[0].value, Decimal::from(170));
        assert_eq!(slices[1].value, Decimal::from(830));
    }

    #[test]
    fn test_overspend_drops_savings_slice() {
        let slices = flow_slices(&summary(100, 400));
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].kind, SliceKind::Outflow);
    }

    #[test]
    fn test_empty_summary_has_no_slices() {
        assert!(flow_slices(&Summary::default()).is_empty());
    }

    #[test]
    fn test_bar_series_follows_table_order() {
        let mut s = summary(0, 0);
        s.category_totals.insert("Food".to_string(), Decimal::from(-20));
        s.category_totals.insert("Rent".to_string(), Decimal::from(-900));
        let bars = bar_series(&CategoryTable::from_summary(&s));
        assert_eq!(bars[0].label, "Rent");
        assert_eq!(bars[1].value, Decimal::from(-20));
    }
}
