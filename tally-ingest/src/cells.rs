//! Cell-level parsing for amounts and dates.
//!
//! Bank exports write amounts in many shapes:
//!   1200.50     $1,200.50     -$14.05     (14.05)     + 5.00
//! All of these reduce to a plain signed decimal before `Decimal` sees them.

use chrono::NaiveDate;
use regex::Regex;
use std::str::FromStr;
use tally_core::Decimal;

use crate::error::Result;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Largest accepted `|amount|` (one quadrillion). Larger cells are treated
/// as unparseable so that sums over any realistic row count stay exact.
pub const MAX_ABS_AMOUNT: i64 = 1_000_000_000_000_000;

/// Compiled patterns for cell cleanup. Build once per load.
#[derive(Debug, Clone)]
pub struct CellParser {
    noise_re: Regex,
    paren_re: Regex,
    number_re: Regex,
}

impl CellParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            // currency marks, whitespace and thousands separators
            noise_re: Regex::new(r"[\s$€£¥,]")?,
            paren_re: Regex::new(r"^\((?P<inner>.*)\)$")?,
            number_re: Regex::new(r"^[+-]?\d+(\.\d+)?$")?,
        })
    }

    /// Parse an amount cell, or `None` when it is blank, not a number, or
    /// larger in magnitude than `MAX_ABS_AMOUNT`.
    pub fn amount(&self, raw: &str) -> Option<Decimal> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let (body, negate) = match self.paren_re.captures(raw) {
            Some(caps) => (caps.name("inner").map(|m| m.as_str()).unwrap_or(""), true),
            None => (raw, false),
        };

        let cleaned = self.noise_re.replace_all(body, "");
        if !self.number_re.is_match(&cleaned) {
            return None;
        }

        let value = Decimal::from_str(cleaned.trim_start_matches('+')).ok()?;
        if value.abs() > Decimal::from(MAX_ABS_AMOUNT) {
            return None;
        }
        Some(if negate { -value } else { value })
    }
}

/// Parse a date cell; time-of-day suffixes are ignored.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.trim().split(['T', ' ']).next()?;
    if day.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(day, fmt).ok())
}
