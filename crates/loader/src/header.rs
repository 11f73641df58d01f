use crate::error::LoaderError;
use core_types::Field;
use csv::StringRecord;
use std::collections::BTreeMap;

/// Cell values in the date column that mark provider framing rows rather than data.
const FRAMING_LABELS: [&str; 3] = ["price", "ticker", "date"];

/// Resolves a single header cell to the base field it names, if any.
///
/// Accepts plain names (`Close`), tuple-qualified names (`('Close', 'AAPL')`)
/// and ticker-qualified names (`Close_AAPL`, `AAPL.Close`). Adjusted closes are
/// deliberately not matched.
pub fn canonical_field(name: &str) -> Option<Field> {
    let lowered = name.to_ascii_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    if tokens
        .iter()
        .any(|t| matches!(*t, "adj" | "adjusted" | "adjclose"))
    {
        return None;
    }

    tokens.iter().find_map(|t| match *t {
        "date" | "datetime" => Some(Field::Date),
        "open" => Some(Field::Open),
        "high" => Some(Field::High),
        "low" => Some(Field::Low),
        "close" => Some(Field::Close),
        "volume" | "vol" => Some(Field::Volume),
        _ => None,
    })
}

/// Which column of the source holds each base field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    columns: BTreeMap<Field, usize>,
}

impl ColumnMap {
    /// Builds the map from the first row of the file.
    ///
    /// When no column is named like a date, an unrecognised first column is
    /// taken to be the date index (download tools label it `Price` or leave it
    /// blank). Every base field must end up mapped.
    pub fn resolve(header: &StringRecord) -> Result<Self, LoaderError> {
        let mut columns = BTreeMap::new();
        for (idx, name) in header.iter().enumerate() {
            if let Some(field) = canonical_field(name) {
                columns.entry(field).or_insert(idx);
            }
        }

        if !columns.contains_key(&Field::Date)
            && header.get(0).is_some_and(|first| canonical_field(first).is_none())
        {
            columns.insert(Field::Date, 0);
        }

        for field in Field::ALL {
            if !columns.contains_key(&field) {
                return Err(LoaderError::MissingColumn(field));
            }
        }

        tracing::debug!(?columns, "Header resolved.");
        Ok(Self { columns })
    }

    pub fn index(&self, field: Field) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    /// The raw text for `field` in `record`, if the row is long enough.
    pub fn cell<'r>(&self, record: &'r StringRecord, field: Field) -> Option<&'r str> {
        self.index(field).and_then(|idx| record.get(idx))
    }

    /// True for the extra header rows (`Ticker,AAPL,...` / `Date,,,...`).
    pub fn is_framing_row(&self, record: &StringRecord) -> bool {
        self.cell(record, Field::Date)
            .map(|c| c.to_ascii_lowercase())
            .is_some_and(|c| FRAMING_LABELS.contains(&c.as_str()))
    }
}
