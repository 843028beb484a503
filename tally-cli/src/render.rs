//! Plain-text rendering of the dashboard sections.

use rust_decimal::prelude::ToPrimitive;
use std::fmt::Write;
use tally_core::{Decimal, Summary, TransactionRow};
use tally_ingest::LoadReport;
use tally_report::{CategoryTable, Page, Slice};

const BAR_WIDTH: usize = 30;

/// `$1,234.56`, `-$14.05`
pub fn money(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}.{frac}")
}

/// Horizontal bar scaled against `max`.
pub fn bar(value: Decimal, max: Decimal) -> String {
    if max.is_zero() {
        return String::new();
    }
    let ratio = (value.abs() / max.abs()).to_f64().unwrap_or_default();
    let len = (ratio * BAR_WIDTH as f64).round() as usize;
    "#".repeat(len.min(BAR_WIDTH))
}

pub fn load_banner(report: &LoadReport, kept: usize) -> String {
    let mut s = format!("Transactions loaded successfully! ({kept} rows");
    if report.dropped_rows > 0 {
        let _ = write!(s, ", {} skipped with unreadable amounts", report.dropped_rows);
    }
    s.push(')');
    s
}

pub fn metrics(summary: &Summary) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "Total Transactions  {}", summary.total_count);
    let _ = writeln!(s, "Total Spent         {}", money(summary.total_amount));
    let _ = writeln!(s, "Inflow              {}", money(summary.inflow_total));
    let _ = writeln!(s, "Outflow             {}", money(summary.outflow_total));
    let _ = writeln!(s, "Savings             {}", money(summary.savings));
    if summary.unclassified_count > 0 {
        let _ = writeln!(
            s,
            "({} rows count toward neither inflow nor outflow (unrecognized type or zero amount))",
            summary.unclassified_count
        );
    }
    s
}

pub fn category_table(table: &CategoryTable) -> String {
    let max = table
        .rows()
        .iter()
        .map(|r| r.amount.abs())
        .max()
        .unwrap_or(Decimal::ZERO);
    let width = table
        .rows()
        .iter()
        .map(|r| r.category.chars().count())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut s = String::new();
    let _ = writeln!(s, "{:<width$}  {:>14}  {:>7}", "Category", "Amount", "Share");
    for r in table.rows() {
        let _ = writeln!(
            s,
            "{:<width$}  {:>14}  {:>6}%  {}",
            r.category,
            money(r.amount),
            r.share_pct,
            bar(r.amount, max)
        );
    }
    s
}

pub fn slices(slices: &[Slice]) -> String {
    let total = slices
        .iter()
        .fold(Decimal::ZERO, |acc, s| acc.saturating_add(s.value));
    let mut s = String::new();
    for slice in slices {
        let pct = if total.is_zero() {
            Decimal::ZERO
        } else {
            (slice.value / total * Decimal::ONE_HUNDRED).round_dp(1)
        };
        let _ = writeln!(
            s,
            "{:<8}  {:>14}  {:>5}%  {}",
            slice.kind.label(),
            money(slice.value),
            pct,
            bar(slice.value, total)
        );
    }
    if slices.is_empty() {
        s.push_str("(nothing to chart)\n");
    }
    s
}

pub fn rows(rows: &[TransactionRow], first_index: usize) -> String {
    let mut s = String::new();
    let _ = writeln!(
        s,
        "{:>4}  {:<10}  {:>12}  {:<8}  {:<16}  {}",
        "#", "Date", "Amount", "Type", "Category", "Description"
    );
    for (i, r) in rows.iter().enumerate() {
        let date = r
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let _ = writeln!(
            s,
            "{:>4}  {:<10}  {:>12}  {:<8}  {:<16}  {}",
            first_index + i,
            date,
            money(r.amount),
            r.flow_label.as_deref().unwrap_or(""),
            r.category.as_deref().unwrap_or(""),
            r.description.as_deref().unwrap_or("")
        );
    }
    s
}

pub fn page(page: &Page<'_, TransactionRow>) -> String {
    let mut s = format!(
        "Page {}/{} ({} rows)\n",
        page.number, page.total_pages, page.total_rows
    );
    s.push_str(&rows(page.items, page.first_index().max(1)));
    s
}

pub fn sample_format() -> &'static str {
    "No transaction file given. Pass --csv <file>.\n\
\n\
Sample CSV format:\n\
  date,amount,category,description\n\
  2025-01-01,50,Food,Lunch\n\
  2025-01-03,120,Transport,Taxi\n\
  2025-01-05,300,Shopping,Clothes\n\
\n\
Optional `type` column: Inflow/Credit or Outflow/Debit. Without it, positive\n\
amounts count as inflow and negative amounts as outflow.\n"
}
