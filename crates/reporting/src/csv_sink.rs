use crate::ReportSink;
use crate::error::ReportError;
use analytics::{AugmentedTable, IndicatorRow};
use core_types::{Cell, Field};
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes the augmented table as delimited text, one row per trading day.
///
/// Undefined cells are written as empty fields so that no reader mistakes a
/// missing value for zero.
#[derive(Debug, Clone)]
pub struct CsvReportSink {
    path: PathBuf,
    delimiter: u8,
}

impl CsvReportSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Column names for `table`; see [`column_names`].
    pub fn header(table: &AugmentedTable) -> Vec<String> {
        column_names(table.short_window(), table.long_window())
    }

    /// Serializes `table` into any writer.
    pub fn write_to<W: Write>(&self, table: &AugmentedTable, writer: W) -> Result<(), ReportError> {
        let mut wtr = WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);

        wtr.write_record(Self::header(table))?;
        for row in table.rows() {
            wtr.write_record(record(row))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl ReportSink for CsvReportSink {
    fn write_report(&self, table: &AugmentedTable) -> Result<(), ReportError> {
        let file = File::create(&self.path)?;
        self.write_to(table, file)?;
        tracing::info!(path = %self.path.display(), rows = table.len(), "Report written.");
        Ok(())
    }
}

/// Column names of an augmented row: the date, the five base columns and the
/// four derived ones. Shared by the export and the console preview.
pub fn column_names(short_window: usize, long_window: usize) -> Vec<String> {
    let mut names: Vec<String> = Field::ALL.iter().map(|f| f.label().to_string()).collect();
    names.extend([
        format!("SMA_{short_window}"),
        format!("SMA_{long_window}"),
        "Daily_Return".to_string(),
        "Cumulative_Return".to_string(),
    ]);
    names
}

fn record(row: &IndicatorRow) -> [String; 10] {
    let bar = &row.bar;
    [
        bar.date.to_string(),
        bar.open.to_string(),
        bar.high.to_string(),
        bar.low.to_string(),
        bar.close.to_string(),
        bar.volume.to_string(),
        format_cell(row.sma_short),
        format_cell(row.sma_long),
        format_cell(row.daily_return),
        format_cell(row.cumulative_return),
    ]
}

/// Shortest round-trip text for defined values, empty for undefined ones.
pub fn format_cell(cell: Cell) -> String {
    match cell {
        Cell::Defined(v) => v.to_string(),
        Cell::Undefined(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::augmented;

    #[test]
    fn header_names_all_columns() {
        let table = augmented(&[100.0, 102.0], 20, 50);
        assert_eq!(
            CsvReportSink::header(&table),
            vec![
                "Date", "Open", "High", "Low", "Close", "Volume", "SMA_20", "SMA_50",
                "Daily_Return", "Cumulative_Return"
            ]
        );
    }

    #[test]
    fn undefined_cells_are_blank() {
        let table = augmented(&[100.0, 102.0, 0.0, 103.0], 2, 3);
        let mut out = Vec::new();
        CsvReportSink::new("unused").write_to(&table, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "2023-01-03,100,100,100,100,1000,,,,0");
        assert_eq!(lines[2], "2023-01-04,102,102,102,102,1000,101,,0.020000000000000018,0.020000000000000018");
        assert_eq!(lines[3], "2023-01-05,0,0,0,0,1000,51,67.33333333333333,,");
        assert!(lines[4].ends_with(",,"));
    }

    #[test]
    fn empty_table_writes_only_the_header() {
        let table = augmented(&[], 20, 50);
        let mut out = Vec::new();
        CsvReportSink::new("unused")
            .with_delimiter(b';')
            .write_to(&table, &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("Date;Open;High"));
    }

    #[test]
    fn writes_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        let table = augmented(&[100.0, 101.0, 102.0], 2, 3);

        CsvReportSink::new(&path).write_report(&table).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 4);
    }
}
