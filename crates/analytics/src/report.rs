use chrono::NaiveDate;
use core_types::{Cell, PriceBar, UndefinedReason};
use rust_decimal::prelude::*;
use serde::Serialize;
use std::fmt;

/// One trading day together with everything derived for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorRow {
    #[serde(flatten)]
    pub bar: PriceBar,
    pub sma_short: Cell,
    pub sma_long: Cell,
    pub daily_return: Cell,
    pub cumulative_return: Cell,
}

/// The price table extended with the derived columns.
///
/// This is the output of the `IndicatorEngine` and the input to every report
/// sink. Rows are in the same order as the source table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AugmentedTable {
    pub(crate) short_window: usize,
    pub(crate) long_window: usize,
    pub(crate) rows: Vec<IndicatorRow>,
}

impl AugmentedTable {
    pub fn short_window(&self) -> usize {
        self.short_window
    }

    pub fn long_window(&self) -> usize {
        self.long_window
    }

    pub fn rows(&self) -> &[IndicatorRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first `n` rows (fewer if the table is shorter).
    pub fn head(&self, n: usize) -> &[IndicatorRow] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// The last `n` rows (fewer if the table is shorter).
    pub fn tail(&self, n: usize) -> &[IndicatorRow] {
        &self.rows[self.rows.len().saturating_sub(n)..]
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.bar.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.bar.close).collect()
    }

    pub fn sma_short(&self) -> Vec<Cell> {
        self.rows.iter().map(|r| r.sma_short).collect()
    }

    pub fn sma_long(&self) -> Vec<Cell> {
        self.rows.iter().map(|r| r.sma_long).collect()
    }

    pub fn daily_returns(&self) -> Vec<Cell> {
        self.rows.iter().map(|r| r.daily_return).collect()
    }

    pub fn cumulative_returns(&self) -> Vec<Cell> {
        self.rows.iter().map(|r| r.cumulative_return).collect()
    }

    /// Total compounded return over the whole table.
    pub fn final_return(&self) -> FinalReturn {
        match self.rows.last() {
            Some(row) => FinalReturn(row.cumulative_return),
            None => FinalReturn(Cell::Undefined(UndefinedReason::InsufficientHistory)),
        }
    }
}

/// The last cumulative return, printed as a signed percentage (`+14.37%`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinalReturn(pub Cell);

impl FinalReturn {
    /// The return as a fraction (0.1437 for +14.37%).
    pub fn as_fraction(&self) -> Option<f64> {
        self.0.value()
    }

    /// The return in percentage points, rounded half away from zero to two places.
    pub fn as_percent(&self) -> Option<Decimal> {
        let pct = Decimal::from_f64(self.as_fraction()? * 100.0)?;
        Some(pct.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }
}

impl fmt::Display for FinalReturn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_percent() {
            Some(pct) => {
                let sign = if pct.is_sign_negative() && !pct.is_zero() { '-' } else { '+' };
                write!(f, "{}{:.2}%", sign, pct.abs())
            }
            None => f.write_str("n/a"),
        }
    }
}
