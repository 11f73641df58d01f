use crate::error::ConfigError;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataSettings,
    pub indicators: IndicatorParams,
    pub report: ReportSettings,
}

/// Where the price series comes from and which slice of it to analyse.
#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    /// The instrument symbol, used for titles only (e.g., "AAPL").
    pub ticker: String,
    /// The delimited price file to read.
    pub input_path: PathBuf,
    /// First date to keep (inclusive).
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Date to stop at (exclusive), matching how download tools treat `end`.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// Window sizes for the two simple moving averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IndicatorParams {
    pub sma_short_window: usize,
    pub sma_long_window: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            sma_short_window: 20,
            sma_long_window: 50,
        }
    }
}

/// Where and how the augmented table is written.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportSettings {
    pub output_path: PathBuf,
    /// Optional JSON file receiving the chart description.
    #[serde(default)]
    pub chart_path: Option<PathBuf>,
    /// Field separator for the exported table. Must be one ASCII character.
    pub delimiter: String,
    /// How many rows to show when previewing the head and tail on the console.
    pub preview_rows: usize,
}

impl ReportSettings {
    /// The delimiter as the single byte the csv writer expects.
    ///
    /// Only meaningful after `Config::validate` has passed.
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter.as_bytes().first().copied().unwrap_or(b',')
    }
}

impl Config {
    /// Checks the cross-field rules that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let windows = &self.indicators;
        if windows.sma_short_window == 0 || windows.sma_long_window == 0 {
            return Err(ConfigError::ValidationError(
                "SMA windows must be at least 1".to_string(),
            ));
        }
        if windows.sma_short_window >= windows.sma_long_window {
            return Err(ConfigError::ValidationError(format!(
                "sma_short_window ({}) must be smaller than sma_long_window ({})",
                windows.sma_short_window, windows.sma_long_window
            )));
        }

        let delimiter = self.report.delimiter.as_bytes();
        if delimiter.len() != 1 || !delimiter[0].is_ascii() {
            return Err(ConfigError::ValidationError(format!(
                "report delimiter must be a single ASCII character, got {:?}",
                self.report.delimiter
            )));
        }

        if let (Some(start), Some(end)) = (self.data.start_date, self.data.end_date) {
            if start >= end {
                return Err(ConfigError::ValidationError(format!(
                    "start_date {} must be before end_date {}",
                    start, end
                )));
            }
        }

        Ok(())
    }

    /// Applies command-line overrides on top of the loaded values, then re-validates.
    pub fn apply(&mut self, overrides: &Overrides) -> Result<(), ConfigError> {
        if let Some(input) = &overrides.input {
            self.data.input_path = input.clone();
        }
        if let Some(ticker) = &overrides.ticker {
            self.data.ticker = ticker.clone();
        }
        if overrides.from.is_some() {
            self.data.start_date = overrides.from;
        }
        if overrides.to.is_some() {
            self.data.end_date = overrides.to;
        }
        if let Some(output) = &overrides.output {
            self.report.output_path = output.clone();
        }
        if let Some(chart) = &overrides.chart {
            self.report.chart_path = Some(chart.clone());
        }
        if let Some(window) = overrides.sma_short {
            self.indicators.sma_short_window = window;
        }
        if let Some(window) = overrides.sma_long {
            self.indicators.sma_long_window = window;
        }
        self.validate()
    }
}

/// Values supplied on the command line that take precedence over the file and environment.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct Overrides {
    /// The price file to analyse.
    #[cfg_attr(feature = "clap", arg(long))]
    pub input: Option<PathBuf>,

    /// The instrument symbol (e.g., "AAPL").
    #[cfg_attr(feature = "clap", arg(long))]
    pub ticker: Option<String>,

    /// First date to keep (format: YYYY-MM-DD, inclusive).
    #[cfg_attr(feature = "clap", arg(long))]
    pub from: Option<NaiveDate>,

    /// Date to stop at (format: YYYY-MM-DD, exclusive).
    #[cfg_attr(feature = "clap", arg(long))]
    pub to: Option<NaiveDate>,

    /// Where to write the augmented table.
    #[cfg_attr(feature = "clap", arg(long))]
    pub output: Option<PathBuf>,

    /// Where to write the chart description as JSON.
    #[cfg_attr(feature = "clap", arg(long))]
    pub chart: Option<PathBuf>,

    /// Short SMA window.
    #[cfg_attr(feature = "clap", arg(long))]
    pub sma_short: Option<usize>,

    /// Long SMA window.
    #[cfg_attr(feature = "clap", arg(long))]
    pub sma_long: Option<usize>,
}
