use crate::ReportSink;
use crate::error::ReportError;
use analytics::AugmentedTable;
use chrono::{Datelike, NaiveDate};
use core_types::Cell;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// A renderer-agnostic description of the price chart.
///
/// Building one touches no global state; any plotting backend can draw it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<LineSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub label: String,
    pub points: Vec<ChartPoint>,
}

/// One point of a line. `value` is `None` where the series has a gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl LineSeries {
    fn from_cells(label: String, dates: &[NaiveDate], cells: &[Cell]) -> Self {
        let points = dates
            .iter()
            .zip(cells)
            .map(|(date, cell)| ChartPoint {
                date: *date,
                value: cell.value(),
            })
            .collect();
        Self { label, points }
    }

    /// Number of points that actually carry a value.
    pub fn defined_points(&self) -> usize {
        self.points.iter().filter(|p| p.value.is_some()).count()
    }
}

/// Describes the close price and both moving averages over the table's dates.
pub fn price_chart(table: &AugmentedTable, ticker: &str) -> ChartSpec {
    let dates = table.dates();
    let closes: Vec<Cell> = table.closes().into_iter().map(Cell::Defined).collect();

    let title = match (dates.first(), dates.last()) {
        (Some(first), Some(last)) if first.year() == last.year() => {
            format!("{} Stock Price Analysis - {}", ticker, first.year())
        }
        (Some(first), Some(last)) => format!(
            "{} Stock Price Analysis - {}-{}",
            ticker,
            first.year(),
            last.year()
        ),
        _ => format!("{} Stock Price Analysis", ticker),
    };

    ChartSpec {
        title,
        x_label: "Date".to_string(),
        y_label: "Price ($)".to_string(),
        series: vec![
            LineSeries::from_cells("Close Price".to_string(), &dates, &closes),
            LineSeries::from_cells(
                format!("{}-Day SMA", table.short_window()),
                &dates,
                &table.sma_short(),
            ),
            LineSeries::from_cells(
                format!("{}-Day SMA", table.long_window()),
                &dates,
                &table.sma_long(),
            ),
        ],
    }
}

/// Saves the chart description as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct ChartJsonSink {
    path: PathBuf,
    ticker: String,
}

impl ChartJsonSink {
    pub fn new(path: impl Into<PathBuf>, ticker: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ticker: ticker.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for ChartJsonSink {
    fn write_report(&self, table: &AugmentedTable) -> Result<(), ReportError> {
        let spec = price_chart(table, &self.ticker);
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, &spec)?;
        writer.flush()?;
        tracing::info!(path = %self.path.display(), "Chart description written.");
        Ok(())
    }
}
