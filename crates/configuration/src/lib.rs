use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, DataSettings, IndicatorParams, Overrides, ReportSettings};

/// The file looked up in the working directory when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "pricelens";

/// Prefix for environment overrides, e.g. `PRICELENS__INDICATORS__SMA_SHORT_WINDOW=10`.
pub const ENV_PREFIX: &str = "PRICELENS";

/// Loads the application configuration.
///
/// Sources are layered, later ones winning: built-in defaults, then the TOML
/// file (`path` if given, otherwise an optional `pricelens.toml`), then
/// `PRICELENS__*` environment variables. The result is validated before it is
/// returned.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let defaults = IndicatorParams::default();

    let file = match path {
        Some(path) if !path.is_file() => {
            return Err(ConfigError::MissingFile(path.to_path_buf()));
        }
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .set_default("data.ticker", "AAPL")?
        .set_default("data.input_path", "data/aapl.csv")?
        .set_default("indicators.sma_short_window", defaults.sma_short_window as i64)?
        .set_default("indicators.sma_long_window", defaults.sma_long_window as i64)?
        .set_default("report.output_path", "aapl_stock_analysis.csv")?
        .set_default("report.delimiter", ",")?
        .set_default("report.preview_rows", 5i64)?
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(?config, "Configuration loaded.");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;

    fn write_toml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn file_values_override_defaults() {
        let file = write_toml(
            r#"
            [data]
            ticker = "MSFT"
            input_path = "msft.csv"
            start_date = "2023-01-01"
            end_date = "2024-01-01"

            [indicators]
            sma_short_window = 10

            [report]
            delimiter = ";"
            "#,
        );

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.data.ticker, "MSFT");
        assert_eq!(config.data.start_date, NaiveDate::from_ymd_opt(2023, 1, 1));
        assert_eq!(config.indicators.sma_short_window, 10);
        assert_eq!(config.indicators.sma_long_window, 50);
        assert_eq!(config.report.delimiter_byte(), b';');
        assert_eq!(config.report.preview_rows, 5);
        assert!(config.report.chart_path.is_none());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = load_config(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(ConfigError::MissingFile(_))));
    }

    #[test]
    fn zero_window_is_rejected() {
        let file = write_toml("[indicators]\nsma_long_window = 0\n");
        let result = load_config(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn short_window_must_be_below_long_window() {
        let file = write_toml("[indicators]\nsma_short_window = 20\nsma_long_window = 20\n");
        let result = load_config(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));

        let file = write_toml("[indicators]\nsma_short_window = 60\n");
        let result = load_config(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let file = write_toml(
            "[data]\nstart_date = \"2024-01-01\"\nend_date = \"2023-01-01\"\n",
        );
        let result = load_config(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn overrides_take_precedence() {
        let file = write_toml("[data]\nticker = \"MSFT\"\n");
        let mut config = load_config(Some(file.path())).unwrap();

        let overrides = Overrides {
            ticker: Some("NVDA".to_string()),
            sma_short: Some(2),
            chart: Some("chart.json".into()),
            ..Overrides::default()
        };
        config.apply(&overrides).unwrap();

        assert_eq!(config.data.ticker, "NVDA");
        assert_eq!(config.indicators.sma_short_window, 2);
        assert_eq!(config.report.chart_path, Some("chart.json".into()));
    }

    #[test]
    fn overrides_are_validated() {
        let file = write_toml("");
        let mut config = load_config(Some(file.path())).unwrap();
        let overrides = Overrides {
            sma_short: Some(0),
            ..Overrides::default()
        };
        assert!(config.apply(&overrides).is_err());
    }
}
