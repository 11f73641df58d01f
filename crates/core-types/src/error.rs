use chrono::NaiveDate;
use thiserror::Error;

use crate::enums::Field;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// `row` is the 0-based position in the sequence handed to the table;
    /// `line` is the source file line when the loader knew it.
    #[error("Malformed record at row {row}{}: {reason}", source_line(.line))]
    MalformedRecord {
        row: usize,
        line: Option<u64>,
        reason: MalformedReason,
    },
}

fn source_line(line: &Option<u64>) -> String {
    line.map(|l| format!(" (line {l})")).unwrap_or_default()
}

/// The structural defect that made a row unusable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedReason {
    #[error("required field '{0}' is missing")]
    MissingField(Field),

    #[error("field '{field}' is not a finite number ({value})")]
    NonFinite { field: Field, value: f64 },

    #[error("date {date} does not come after the previous date {previous}")]
    OutOfOrder { date: NaiveDate, previous: NaiveDate },

    #[error("date {0} appears more than once")]
    DuplicateDate(NaiveDate),
}
