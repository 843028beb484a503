//! Sortable category → amount table for bar/pie breakdowns.

use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Ordering;
use std::str::FromStr;
use tally_core::Summary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Absolute amount
    Magnitude,
    /// Signed amount
    Amount,
    Name,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "magnitude" | "abs" => Ok(SortKey::Magnitude),
            "amount" => Ok(SortKey::Amount),
            "name" | "category" => Ok(SortKey::Name),
            other => Err(format!("unknown sort key `{other}` (expected magnitude, amount or name)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRow {
    pub category: String,
    pub amount: Decimal,
    /// Share of the summed category magnitudes, in percent (2 dp)
    pub share_pct: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryTable {
    rows: Vec<CategoryRow>,
}

impl CategoryTable {
    /// Build from a summary, largest magnitude first.
    pub fn from_summary(summary: &Summary) -> Self {
        let denom = summary
            .category_totals
            .values()
            .fold(Decimal::ZERO, |acc, v| acc.saturating_add(v.abs()));
        let rows = summary
            .category_totals
            .iter()
            .map(|(category, amount)| CategoryRow {
                category: category.clone(),
                amount: *amount,
                share_pct: share(*amount, denom),
            })
            .collect();
        Self { rows }.sorted(SortKey::Magnitude, SortOrder::Descending)
    }

    /// Re-sort; equal keys fall back to ascending name.
    pub fn sorted(mut self, key: SortKey, order: SortOrder) -> Self {
        self.rows.sort_by(|a, b| {
            let primary = match key {
                SortKey::Magnitude => a.amount.abs().cmp(&b.amount.abs()),
                SortKey::Amount => a.amount.cmp(&b.amount),
                SortKey::Name => a.category.cmp(&b.category),
            };
            let primary = match order {
                SortOrder::Ascending => primary,
                SortOrder::Descending => primary.reverse(),
            };
            match primary {
                Ordering::Equal => a.category.cmp(&b.category),
                o => o,
            }
        });
        self
    }

    pub fn rows(&self) -> &[CategoryRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn share(amount: Decimal, denom: Decimal) -> Decimal {
    if denom.is_zero() {
        return Decimal::ZERO;
    }
    (amount.abs() / denom * Decimal::ONE_HUNDRED).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::{summarize, SummarizerConfig, TransactionRow, TransactionSet};

    fn summary() -> Summary {
        let set: TransactionSet = vec![
            TransactionRow::new(Decimal::from(-50)).with_category("Food"),
            TransactionRow::new(Decimal::from(-150)).with_category("Transport"),
            TransactionRow::new(Decimal::from(200)).with_category("Salary"),
            TransactionRow::new(Decimal::from(-200)).with_category("Rent"),
        ]
        .into_iter()
        .collect();
        summarize(&set, &SummarizerConfig::default())
    }

    fn names(t: &CategoryTable) -> Vec<&str> {
        t.rows().iter().map(|r| r.category.as_str()).collect()
    }

    #[test]
    fn test_default_order_and_shares() {
        let t = CategoryTable::from_summary(&summary());
        assert_eq!(names(&t), vec!["Rent", "Salary", "Transport", "Food"]);
        assert_eq!(t.rows()[0].share_pct, "33.33".parse::<Decimal>().unwrap());
        assert_eq!(t.rows()[3].share_pct, "8.33".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_resort() {
        let t = CategoryTable::from_summary(&summary());
        let by_amount = t.clone().sorted(SortKey::Amount, SortOrder::Ascending);
        assert_eq!(names(&by_amount), vec!["Rent", "Transport", "Food", "Salary"]);
        let by_name = t.sorted(SortKey::Name, SortOrder::Ascending);
        assert_eq!(names(&by_name), vec!["Food", "Rent", "Salary", "Transport"]);
    }

    #[test]
    fn test_empty_summary() {
        let t = CategoryTable::from_summary(&Summary::default());
        assert!(t.is_empty());
    }

    #[test]
    fn test_huge_totals_do_not_overflow() {
        let mut summary = Summary::default();
        summary.category_totals.insert("A".to_string(), Decimal::MAX);
        summary.category_totals.insert("B".to_string(), Decimal::MIN);
        let table = CategoryTable::from_summary(&summary);
        assert_eq!(table.rows().len(), 2);
        assert!(table.rows().iter().all(|r| r.share_pct == Decimal::ONE_HUNDRED));
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!("Magnitude".parse::<SortKey>(), Ok(SortKey::Magnitude));
        assert_eq!("name".parse::<SortKey>(), Ok(SortKey::Name));
        assert!("size".parse::<SortKey>().is_err());
    }
}
