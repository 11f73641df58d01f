use core_types::{Field, RawBar};
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-column count of missing values in a batch of loaded rows.
///
/// Reported before table construction so a user can see which columns have
/// gaps, instead of only the first offending row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MissingValueSummary {
    rows: usize,
    counts: BTreeMap<Field, usize>,
}

impl MissingValueSummary {
    pub fn from_rows(rows: &[RawBar]) -> Self {
        let mut counts: BTreeMap<Field, usize> = Field::ALL.iter().map(|f| (*f, 0)).collect();
        for row in rows {
            let gaps = [
                (Field::Date, row.date.is_none()),
                (Field::Open, row.open.is_none()),
                (Field::High, row.high.is_none()),
                (Field::Low, row.low.is_none()),
                (Field::Close, row.close.is_none()),
                (Field::Volume, row.volume.is_none()),
            ];
            for (field, missing) in gaps {
                if missing {
                    *counts.entry(field).or_insert(0) += 1;
                }
            }
        }
        Self {
            rows: rows.len(),
            counts,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn count(&self, field: Field) -> usize {
        self.counts.get(&field).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_complete(&self) -> bool {
        self.total() == 0
    }

    /// Counts in column order: date, open, high, low, close, volume.
    pub fn iter(&self) -> impl Iterator<Item = (Field, usize)> + '_ {
        Field::ALL.iter().map(|f| (*f, self.count(*f)))
    }
}
