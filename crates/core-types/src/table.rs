use chrono::NaiveDate;
use serde::Serialize;

use crate::cell::Cell;
use crate::enums::Field;
use crate::error::{CoreError, MalformedReason};
use crate::structs::{PriceBar, RawBar};

/// An ordered, validated daily price series for a single instrument.
///
/// Construction is the only place structural checks happen. Once built the
/// table is read-only: dates strictly increase and every price is finite.
/// Non-positive closes are allowed through; they are a numeric anomaly that
/// the indicator layer absorbs, not a structural defect.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceTable {
    bars: Vec<PriceBar>,
}

impl PriceTable {
    /// Validates `bars` and wraps them. Fails on the first malformed row.
    pub fn try_new(bars: Vec<PriceBar>) -> Result<Self, CoreError> {
        let mut previous: Option<NaiveDate> = None;

        for (row, bar) in bars.iter().enumerate() {
            for (field, value) in [
                (Field::Open, bar.open),
                (Field::High, bar.high),
                (Field::Low, bar.low),
                (Field::Close, bar.close),
            ] {
                if !value.is_finite() {
                    return Err(malformed(row, MalformedReason::NonFinite { field, value }));
                }
            }

            if let Some(prev) = previous {
                if bar.date == prev {
                    return Err(malformed(row, MalformedReason::DuplicateDate(bar.date)));
                }
                if bar.date < prev {
                    return Err(malformed(
                        row,
                        MalformedReason::OutOfOrder {
                            date: bar.date,
                            previous: prev,
                        },
                    ));
                }
            }
            previous = Some(bar.date);
        }

        tracing::debug!(rows = bars.len(), "Price table validated.");
        Ok(Self { bars })
    }

    /// Builds a table from loader rows, rejecting any row with a missing field.
    ///
    /// Rows are checked in the order given; nothing is sorted. Errors carry the
    /// source line of the offending row when the loader recorded one.
    pub fn from_raw(rows: Vec<RawBar>) -> Result<Self, CoreError> {
        let lines: Vec<Option<u64>> = rows.iter().map(|r| r.line).collect();
        let bars = rows
            .into_iter()
            .enumerate()
            .map(|(row, raw)| complete(row, raw))
            .collect::<Result<Vec<_>, _>>()?;
        Self::try_new(bars).map_err(|err| match err {
            CoreError::MalformedRecord { row, reason, .. } => CoreError::MalformedRecord {
                row,
                line: lines.get(row).copied().flatten(),
                reason,
            },
        })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PriceBar> {
        self.bars.iter()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    /// The close column as cells, ready for the indicator functions.
    pub fn closes(&self) -> Vec<Cell> {
        self.bars.iter().map(|b| Cell::Defined(b.close)).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }
}

impl<'a> IntoIterator for &'a PriceTable {
    type Item = &'a PriceBar;
    type IntoIter = std::slice::Iter<'a, PriceBar>;

    fn into_iter(self) -> Self::IntoIter {
        self.bars.iter()
    }
}

fn malformed(row: usize, reason: MalformedReason) -> CoreError {
    CoreError::MalformedRecord {
        row,
        line: None,
        reason,
    }
}

fn complete(row: usize, raw: RawBar) -> Result<PriceBar, CoreError> {
    let missing = |field| CoreError::MalformedRecord {
        row,
        line: raw.line,
        reason: MalformedReason::MissingField(field),
    };
    Ok(PriceBar {
        date: raw.date.ok_or_else(|| missing(Field::Date))?,
        open: raw.open.ok_or_else(|| missing(Field::Open))?,
        high: raw.high.ok_or_else(|| missing(Field::High))?,
        low: raw.low.ok_or_else(|| missing(Field::Low))?,
        close: raw.close.ok_or_else(|| missing(Field::Close))?,
        volume: raw.volume.ok_or_else(|| missing(Field::Volume))?,
    })
}
