//! Column-level building blocks.
//!
//! Every function here maps an input column to an output column of the same
//! length, and the value at index `i` only ever reads inputs at indices `<= i`.

use crate::error::AnalyticsError;
use core_types::{Cell, UndefinedReason};
use std::iter;

/// Simple moving average over `window` consecutive cells.
///
/// The first `window - 1` outputs are `InsufficientHistory`. Any undefined
/// cell inside a window makes that window's mean `MissingInput`; inputs are
/// never skipped.
pub fn rolling_mean(values: &[Cell], window: usize) -> Result<Vec<Cell>, AnalyticsError> {
    if window == 0 {
        return Err(AnalyticsError::InvalidWindow(window));
    }

    let warmup = (window - 1).min(values.len());
    let mut out = Vec::with_capacity(values.len());
    out.extend(iter::repeat_n(
        Cell::Undefined(UndefinedReason::InsufficientHistory),
        warmup,
    ));
    out.extend(values.windows(window).map(window_mean));
    Ok(out)
}

fn window_mean(window: &[Cell]) -> Cell {
    let mut sum = 0.0;
    for cell in window {
        match cell {
            Cell::Defined(v) => sum += v,
            Cell::Undefined(_) => return Cell::Undefined(UndefinedReason::MissingInput),
        }
    }
    Cell::from_finite(sum / window.len() as f64)
}

/// Period-over-period fractional change: `x[i] / x[i-1] - 1`.
///
/// The first output has no prior period. A zero or negative price on either
/// side of the ratio gives `UndefinedRatio` for that index only.
pub fn pct_change(values: &[Cell]) -> Vec<Cell> {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }

    out.push(Cell::Undefined(UndefinedReason::InsufficientHistory));
    out.extend(values.windows(2).map(|pair| match (pair[0], pair[1]) {
        (Cell::Defined(prev), Cell::Defined(curr)) if prev > 0.0 && curr > 0.0 => {
            Cell::from_finite(curr / prev - 1.0)
        }
        (Cell::Defined(_), Cell::Defined(_)) => Cell::Undefined(UndefinedReason::UndefinedRatio),
        _ => Cell::Undefined(UndefinedReason::MissingInput),
    }));
    out
}

/// Compounds a return column into a cumulative return column.
///
/// `out[i] = (1 + r[1]) * ... * (1 + r[i]) - 1`. Index 0 contributes a
/// neutral factor whatever its cell holds, so `out[0]` is `0.0` for any
/// non-empty input. The product is carried forward one step at a time; once a
/// return is undefined every later output is undefined with the same reason.
pub fn compound(returns: &[Cell]) -> Vec<Cell> {
    let mut growth: Result<f64, UndefinedReason> = Ok(1.0);

    returns
        .iter()
        .enumerate()
        .map(|(i, ret)| {
            if i > 0 {
                growth = match (growth, ret) {
                    (Ok(g), Cell::Defined(r)) => Ok(g * (1.0 + r)),
                    (Ok(_), Cell::Undefined(reason)) => Err(*reason),
                    (Err(reason), _) => Err(reason),
                };
            }
            match growth {
                Ok(g) => Cell::from_finite(g - 1.0),
                Err(reason) => Cell::Undefined(reason),
            }
        })
        .collect()
}
