//! Output side of the pipeline: file sinks, the chart description and
//! console previews.

use analytics::AugmentedTable;

pub mod chart;
pub mod csv_sink;
pub mod error;
pub mod preview;

pub use chart::{ChartJsonSink, ChartPoint, ChartSpec, LineSeries, price_chart};
pub use csv_sink::CsvReportSink;
pub use error::ReportError;

/// Anything that persists or renders a finished `AugmentedTable`.
pub trait ReportSink {
    fn write_report(&self, table: &AugmentedTable) -> Result<(), ReportError>;
}
