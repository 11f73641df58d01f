use analytics::{AnalyticsError, AugmentedTable, IndicatorEngine};
use configuration::{Config, IndicatorParams};
use core_types::{CoreError, PriceTable, RawBar};
use loader::{CsvLoader, LoaderError, SeriesLoader};
use reporting::{ChartJsonSink, CsvReportSink, ReportError, ReportSink};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Loading error: {0}")]
    Loader(#[from] LoaderError),
    #[error("Invalid price table: {0}")]
    Table(#[from] CoreError),
    #[error("Indicator error: {0}")]
    Analytics(#[from] AnalyticsError),
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

/// The file loader described by the `[data]` section.
pub fn loader_for(config: &Config) -> CsvLoader {
    CsvLoader::new(&config.data.input_path)
        .with_date_range(config.data.start_date, config.data.end_date)
}

/// Validates raw rows into a table and derives the indicator columns.
///
/// Structural problems fail here, before any indicator runs.
pub fn analyze(rows: Vec<RawBar>, params: IndicatorParams) -> Result<AugmentedTable, PipelineError> {
    let table = PriceTable::from_raw(rows)?;
    if table.is_empty() {
        tracing::warn!("Price table is empty; every indicator will be undefined.");
    }

    let engine = IndicatorEngine::new(params)?;
    let augmented = engine.calculate(&table)?;
    tracing::info!(
        rows = augmented.len(),
        first = ?table.first_date(),
        last = ?table.last_date(),
        final_return = %augmented.final_return(),
        "Indicators calculated."
    );
    Ok(augmented)
}

/// Every sink the `[report]` section asks for, in write order.
pub fn sinks_for(config: &Config) -> Vec<(PathBuf, Box<dyn ReportSink>)> {
    let report = &config.report;
    let csv: Box<dyn ReportSink> =
        Box::new(CsvReportSink::new(&report.output_path).with_delimiter(report.delimiter_byte()));
    let mut sinks = vec![(report.output_path.clone(), csv)];

    if let Some(chart_path) = &report.chart_path {
        let chart: Box<dyn ReportSink> =
            Box::new(ChartJsonSink::new(chart_path, config.data.ticker.clone()));
        sinks.push((chart_path.clone(), chart));
    }
    sinks
}

/// Hands the finished table to every configured sink and returns the paths written.
pub fn save(table: &AugmentedTable, config: &Config) -> Result<Vec<PathBuf>, PipelineError> {
    let mut written = Vec::new();
    for (path, sink) in sinks_for(config) {
        sink.write_report(table)?;
        written.push(path);
    }
    Ok(written)
}

/// Load, analyse and save in one call.
pub fn run(loader: &dyn SeriesLoader, config: &Config) -> Result<AugmentedTable, PipelineError> {
    let rows = loader.load()?;
    let table = analyze(rows, config.indicators)?;
    save(&table, config)?;
    Ok(table)
}
