use crate::SeriesLoader;
use crate::error::LoaderError;
use crate::header::ColumnMap;
use chrono::NaiveDate;
use core_types::{Field, RawBar};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Cell contents treated as "no value" rather than a parse failure.
const MISSING_TOKENS: [&str; 6] = ["", "nan", "na", "n/a", "null", "none"];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Reads daily bars from a delimited text file.
#[derive(Debug, Clone)]
pub struct CsvLoader {
    path: PathBuf,
    delimiter: u8,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl CsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: b',',
            start: None,
            end: None,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Keeps only rows with `start <= date < end`. Either bound may be open.
    pub fn with_date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses rows from any reader. `load` is this applied to the configured file.
    pub fn read<R: Read>(&self, reader: R) -> Result<Vec<RawBar>, LoaderError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .delimiter(self.delimiter)
            .from_reader(reader);

        let mut records = rdr.records();
        let header = records.next().ok_or(LoaderError::EmptyFile)??;
        let columns = ColumnMap::resolve(&header)?;

        let mut rows = Vec::new();
        let mut framing = 0usize;
        let mut filtered = 0usize;

        for result in records {
            let record = result?;
            if columns.is_framing_row(&record) {
                framing += 1;
                continue;
            }

            let line = record.position().map_or(0, |p| p.line());
            let row = parse_row(&record, &columns, line)?;
            if self.in_range(&row) {
                rows.push(row);
            } else {
                filtered += 1;
            }
        }

        // File order is kept; ordering and duplicates are the table's to reject.
        tracing::info!(
            rows = rows.len(),
            framing_rows = framing,
            outside_range = filtered,
            "Price rows loaded."
        );
        Ok(rows)
    }

    fn in_range(&self, row: &RawBar) -> bool {
        let Some(date) = row.date else {
            return true;
        };
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date < end)
    }
}

impl SeriesLoader for CsvLoader {
    fn load(&self) -> Result<Vec<RawBar>, LoaderError> {
        tracing::info!(path = %self.path.display(), "Reading price file.");
        let file = File::open(&self.path)?;
        self.read(file)
    }
}

fn parse_row(record: &StringRecord, columns: &ColumnMap, line: u64) -> Result<RawBar, LoaderError> {
    let cell = |field| present(columns.cell(record, field));
    Ok(RawBar {
        line: Some(line),
        date: cell(Field::Date).map(|v| parse_date(v, line)).transpose()?,
        open: cell(Field::Open).map(|v| parse_price(v, Field::Open, line)).transpose()?,
        high: cell(Field::High).map(|v| parse_price(v, Field::High, line)).transpose()?,
        low: cell(Field::Low).map(|v| parse_price(v, Field::Low, line)).transpose()?,
        close: cell(Field::Close).map(|v| parse_price(v, Field::Close, line)).transpose()?,
        volume: cell(Field::Volume).map(|v| parse_volume(v, line)).transpose()?,
    })
}

/// `None` for absent cells and the usual spellings of a missing value.
fn present(raw: Option<&str>) -> Option<&str> {
    raw.filter(|v| !MISSING_TOKENS.contains(&v.to_ascii_lowercase().as_str()))
}

fn parse_error(line: u64, field: Field, value: &str, reason: impl Into<String>) -> LoaderError {
    LoaderError::Parse {
        line,
        field,
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Accepts ISO dates with or without a trailing time part, plus two common
/// slash layouts.
fn parse_date(raw: &str, line: u64) -> Result<NaiveDate, LoaderError> {
    let candidates = [raw.get(..10), Some(raw)];
    candidates
        .into_iter()
        .flatten()
        .flat_map(|text| DATE_FORMATS.iter().map(move |fmt| (text, *fmt)))
        .find_map(|(text, fmt)| NaiveDate::parse_from_str(text, fmt).ok())
        .ok_or_else(|| parse_error(line, Field::Date, raw, "unrecognised date format"))
}

fn parse_price(raw: &str, field: Field, line: u64) -> Result<f64, LoaderError> {
    raw.parse::<f64>()
        .map_err(|e| parse_error(line, field, raw, e.to_string()))
}

/// Volumes are integers, but files with gaps often store them as `1234.0`.
fn parse_volume(raw: &str, line: u64) -> Result<u64, LoaderError> {
    if let Ok(volume) = raw.parse::<u64>() {
        return Ok(volume);
    }
    let value = raw
        .parse::<f64>()
        .map_err(|e| parse_error(line, Field::Volume, raw, e.to_string()))?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64 {
        Ok(value as u64)
    } else {
        Err(parse_error(
            line,
            Field::Volume,
            raw,
            "volume must be a non-negative whole number",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{CoreError, MalformedReason, PriceTable};
    use std::io::Write;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn reads_a_flat_file() {
        let csv = "Date,Open,High,Low,Close,Volume\n\
                   2023-01-03,130.28,130.90,124.17,125.07,112117500\n\
                   2023-01-04,126.89,128.66,125.08,126.36,89113600\n";
        let rows = CsvLoader::new("unused").read(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, Some(date(2023, 1, 3)));
        assert_eq!(rows[0].close, Some(125.07));
        assert_eq!(rows[1].volume, Some(89_113_600));
    }

    #[test]
    fn flattens_the_three_row_download_header() {
        let csv = "Price,Close,High,Low,Open,Volume\n\
                   Ticker,AAPL,AAPL,AAPL,AAPL,AAPL\n\
                   Date,,,,,\n\
                   2023-01-03,125.07,130.90,124.17,130.28,112117500\n";
        let rows = CsvLoader::new("unused").read(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].open, Some(130.28));
        assert_eq!(rows[0].close, Some(125.07));
    }

    #[test]
    fn ignores_adjusted_close_and_extra_columns() {
        let csv = "Date,Open,High,Low,Close,Adj Close,Volume,Dividends\n\
                   2023-01-03,1,2,0.5,1.5,1.4,100,0\n";
        let rows = CsvLoader::new("unused").read(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].close, Some(1.5));
        assert_eq!(rows[0].volume, Some(100));
    }

    #[test]
    fn blank_and_nan_cells_are_missing() {
        let csv = "Date,Open,High,Low,Close,Volume\n\
                   2023-01-03,,2,NaN,1.5,\n";
        let rows = CsvLoader::new("unused").read(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].open, None);
        assert_eq!(rows[0].low, None);
        assert_eq!(rows[0].volume, None);
        assert_eq!(rows[0].high, Some(2.0));
    }

    #[test]
    fn garbage_numbers_are_parse_errors() {
        let csv = "Date,Open,High,Low,Close,Volume\n\
                   2023-01-03,1,2,0.5,abc,100\n";
        let err = CsvLoader::new("unused").read(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoaderError::Parse { line: 2, field: Field::Close, .. }
        ));
    }

    #[test]
    fn negative_volume_is_rejected() {
        let csv = "Date,Open,High,Low,Close,Volume\n2023-01-03,1,2,0.5,1,-5\n";
        let err = CsvLoader::new("unused").read(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoaderError::Parse { field: Field::Volume, .. }));
    }

    #[test]
    fn float_volume_is_accepted_when_whole() {
        assert_eq!(parse_volume("1234.0", 1).unwrap(), 1234);
        assert!(parse_volume("12.5", 1).is_err());
    }

    #[test]
    fn dates_with_time_parts_and_slashes() {
        assert_eq!(parse_date("2023-01-03 00:00:00-05:00", 1).unwrap(), date(2023, 1, 3));
        assert_eq!(parse_date("01/03/2023", 1).unwrap(), date(2023, 1, 3));
        assert!(parse_date("yesterday", 1).is_err());
    }

    #[test]
    fn date_range_is_start_inclusive_end_exclusive() {
        let csv = "Date,Open,High,Low,Close,Volume\n\
                   2022-12-30,1,1,1,1,1\n\
                   2023-01-03,1,1,1,1,1\n\
                   2023-12-29,1,1,1,1,1\n\
                   2024-01-01,1,1,1,1,1\n";
        let rows = CsvLoader::new("unused")
            .with_date_range(Some(date(2023, 1, 3)), Some(date(2024, 1, 1)))
            .read(csv.as_bytes())
            .unwrap();
        let dates: Vec<_> = rows.iter().filter_map(|r| r.date).collect();
        assert_eq!(dates, vec![date(2023, 1, 3), date(2023, 12, 29)]);
    }

    #[test]
    fn rows_keep_file_order_and_line_numbers() {
        let csv = "Date,Open,High,Low,Close,Volume\n\
                   2023-01-04,1,1,1,2,1\n\
                   2023-01-03,1,1,1,1,1\n";
        let rows = CsvLoader::new("unused").read(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].close, Some(2.0));
        assert_eq!(rows[1].close, Some(1.0));
        assert_eq!(rows[0].line, Some(2));
        assert_eq!(rows[1].line, Some(3));
    }

    #[test]
    fn unsorted_file_is_rejected_by_the_table() {
        let csv = "Date,Open,High,Low,Close,Volume\n\
                   2023-01-05,1,1,1,1,1\n\
                   2023-01-03,1,1,1,1,1\n\
                   2023-01-04,1,1,1,1,1\n";
        let rows = CsvLoader::new("unused").read(csv.as_bytes()).unwrap();
        let err = PriceTable::from_raw(rows).unwrap_err();
        assert_eq!(
            err,
            CoreError::MalformedRecord {
                row: 1,
                line: Some(3),
                reason: MalformedReason::OutOfOrder {
                    date: date(2023, 1, 3),
                    previous: date(2023, 1, 5),
                },
            }
        );
    }

    #[test]
    fn missing_date_late_in_the_file_reports_its_line() {
        let csv = "Price,Close,High,Low,Open,Volume\n\
                   Ticker,AAPL,AAPL,AAPL,AAPL,AAPL\n\
                   Date,,,,,\n\
                   2023-01-03,1,1,1,1,1\n\
                   2023-01-04,1,1,1,1,1\n\
                   ,1,1,1,1,1\n";
        let rows = CsvLoader::new("unused").read(csv.as_bytes()).unwrap();
        let err = PriceTable::from_raw(rows).unwrap_err();
        assert_eq!(
            err,
            CoreError::MalformedRecord {
                row: 2,
                line: Some(6),
                reason: MalformedReason::MissingField(Field::Date),
            }
        );
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(
            CsvLoader::new("unused").read("".as_bytes()),
            Err(LoaderError::EmptyFile)
        ));
    }

    #[test]
    fn header_only_file_gives_no_rows() {
        let rows = CsvLoader::new("unused")
            .read("Date,Open,High,Low,Close,Volume\n".as_bytes())
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn loads_from_disk_with_custom_delimiter() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Date;Open;High;Low;Close;Volume").unwrap();
        writeln!(file, "2023-01-03;1;2;0.5;1.5;100").unwrap();

        let rows = CsvLoader::new(file.path())
            .with_delimiter(b';')
            .load()
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].close, Some(1.5));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = CsvLoader::new("/definitely/not/here.csv").load().unwrap_err();
        assert!(matches!(err, LoaderError::Io(_)));
    }
}
