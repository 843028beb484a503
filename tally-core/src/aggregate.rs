//! Scalar and grouped sums over transaction rows.
//!
//! All sums use exact decimal arithmetic, so results do not depend on row
//! order. Empty inputs sum to zero. Sums saturate at `Decimal::MAX` rather
//! than overflow; loaded amounts are bounded well below that.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::transaction::TransactionRow;

/// Signed sum of `amount`.
pub fn total<'a>(rows: impl IntoIterator<Item = &'a TransactionRow>) -> Decimal {
    rows.into_iter()
        .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.amount))
}

/// Sum of `|amount|`. Inflow and outflow totals are reported this way.
pub fn magnitude<'a>(rows: impl IntoIterator<Item = &'a TransactionRow>) -> Decimal {
    rows.into_iter()
        .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.abs_amount()))
}

/// Signed sum per category. Rows without a category go under `bucket`.
pub fn group_sum<'a>(
    rows: impl IntoIterator<Item = &'a TransactionRow>,
    bucket: &str,
) -> BTreeMap<String, Decimal> {
    let mut groups: BTreeMap<String, Decimal> = BTreeMap::new();
    for row in rows {
        let key = row
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(bucket);
        let sum = groups.entry(key.to_string()).or_insert(Decimal::ZERO);
        *sum = sum.saturating_add(row.amount);
    }
    groups
}

/// `inflow - outflow`, floored at zero when `clamp_zero` is set.
pub fn savings(inflow_total: Decimal, outflow_total: Decimal, clamp_zero: bool) -> Decimal {
    let net = inflow_total.saturating_sub(outflow_total);
    if clamp_zero && net < Decimal::ZERO {
        Decimal::ZERO
    } else {
        net
    }
}
